//! Member profile storage
//!
//! Rows hold the flat flag layout produced by
//! [`shared::models::to_storage_record`].

use shared::models::MemberDataRecord;
use sqlx::{PgExecutor, PgPool};

use super::BoxError;

const DATA_COLUMNS: &str = "
    org_main, org_women, org_hackathon, org_competitive, org_research,
    eth_white, eth_black, eth_hispanic, eth_asian, eth_native_american,
    eth_pacific_islander, eth_multiracial, gi_male, gi_female, gi_non_binary,
    gi_transgender, gi_intersex, gi_does_not_identify, other_identity, major,
    classification, graduation_date, shirt_type, shirt_size, address";

pub async fn get_member_data(
    pool: &PgPool,
    member_id: &str,
) -> Result<Option<MemberDataRecord>, BoxError> {
    let row: Option<MemberDataRecord> = sqlx::query_as(&format!(
        "SELECT {DATA_COLUMNS} FROM member_data WHERE member_id = $1"
    ))
    .bind(member_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Insert or merge a profile row.
///
/// `NULL` in `record` means "not collected": the stored value is kept. The
/// free-text identity follows the identity flags, so it is replaced (or
/// cleared) whenever identity was collected.
pub async fn upsert_member_data<'e, E: PgExecutor<'e>>(
    executor: E,
    member_id: &str,
    record: &MemberDataRecord,
) -> Result<(), BoxError> {
    sqlx::query(&format!(
        r#"
        INSERT INTO member_data (member_id, {DATA_COLUMNS})
        VALUES (
            $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15,
            $16, $17, $18, $19, $20, $21, $22, $23, $24, $25, $26
        )
        ON CONFLICT (member_id) DO UPDATE SET
            org_main = COALESCE(EXCLUDED.org_main, member_data.org_main),
            org_women = COALESCE(EXCLUDED.org_women, member_data.org_women),
            org_hackathon = COALESCE(EXCLUDED.org_hackathon, member_data.org_hackathon),
            org_competitive = COALESCE(EXCLUDED.org_competitive, member_data.org_competitive),
            org_research = COALESCE(EXCLUDED.org_research, member_data.org_research),
            eth_white = COALESCE(EXCLUDED.eth_white, member_data.eth_white),
            eth_black = COALESCE(EXCLUDED.eth_black, member_data.eth_black),
            eth_hispanic = COALESCE(EXCLUDED.eth_hispanic, member_data.eth_hispanic),
            eth_asian = COALESCE(EXCLUDED.eth_asian, member_data.eth_asian),
            eth_native_american = COALESCE(EXCLUDED.eth_native_american, member_data.eth_native_american),
            eth_pacific_islander = COALESCE(EXCLUDED.eth_pacific_islander, member_data.eth_pacific_islander),
            eth_multiracial = COALESCE(EXCLUDED.eth_multiracial, member_data.eth_multiracial),
            gi_male = COALESCE(EXCLUDED.gi_male, member_data.gi_male),
            gi_female = COALESCE(EXCLUDED.gi_female, member_data.gi_female),
            gi_non_binary = COALESCE(EXCLUDED.gi_non_binary, member_data.gi_non_binary),
            gi_transgender = COALESCE(EXCLUDED.gi_transgender, member_data.gi_transgender),
            gi_intersex = COALESCE(EXCLUDED.gi_intersex, member_data.gi_intersex),
            gi_does_not_identify = COALESCE(EXCLUDED.gi_does_not_identify, member_data.gi_does_not_identify),
            other_identity = CASE WHEN EXCLUDED.gi_male IS NOT NULL
                THEN EXCLUDED.other_identity ELSE member_data.other_identity END,
            major = COALESCE(EXCLUDED.major, member_data.major),
            classification = COALESCE(EXCLUDED.classification, member_data.classification),
            graduation_date = COALESCE(EXCLUDED.graduation_date, member_data.graduation_date),
            shirt_type = COALESCE(EXCLUDED.shirt_type, member_data.shirt_type),
            shirt_size = COALESCE(EXCLUDED.shirt_size, member_data.shirt_size),
            address = COALESCE(EXCLUDED.address, member_data.address)
        "#
    ))
    .bind(member_id)
    .bind(record.org_main)
    .bind(record.org_women)
    .bind(record.org_hackathon)
    .bind(record.org_competitive)
    .bind(record.org_research)
    .bind(record.eth_white)
    .bind(record.eth_black)
    .bind(record.eth_hispanic)
    .bind(record.eth_asian)
    .bind(record.eth_native_american)
    .bind(record.eth_pacific_islander)
    .bind(record.eth_multiracial)
    .bind(record.gi_male)
    .bind(record.gi_female)
    .bind(record.gi_non_binary)
    .bind(record.gi_transgender)
    .bind(record.gi_intersex)
    .bind(record.gi_does_not_identify)
    .bind(&record.other_identity)
    .bind(&record.major)
    .bind(&record.classification)
    .bind(&record.graduation_date)
    .bind(&record.shirt_type)
    .bind(&record.shirt_size)
    .bind(&record.address)
    .execute(executor)
    .await?;
    Ok(())
}
