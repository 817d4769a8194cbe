//! Member demographic/academic profile
//!
//! Two shapes of the same data:
//!
//! - [`MemberDataInput`] / [`MemberProfile`]: the "pretty" shape API callers see,
//!   with organizations, ethnicity and gender identity as enum tags and sets.
//! - [`MemberDataRecord`]: the storage shape, one nullable boolean column per
//!   enum value. `NULL` means the category was never collected, `false` means
//!   collected and not selected.
//!
//! [`to_storage_record`] and [`to_pretty_record`] are the only places that know
//! the column layout; nothing above this module touches the flag columns.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::validation::{MAX_ADDRESS_LEN, MAX_NAME_LEN, MAX_NOTE_LEN, validate_optional_text};

/// An enum stored as one nullable boolean column per variant.
pub trait FlagTag: Copy + Ord + Sized + 'static {
    /// Every variant, in column order
    const ALL: &'static [Self];

    /// Wire/tag name
    fn tag(self) -> &'static str;

    fn flag(record: &MemberDataRecord, tag: Self) -> Option<bool>;

    fn flag_mut(record: &mut MemberDataRecord, tag: Self) -> &mut Option<bool>;

    /// Case-insensitive tag lookup
    fn from_tag(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.tag().eq_ignore_ascii_case(raw))
    }
}

/// Sub-organization a member belongs to, also used as an event's hosting tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Organization {
    Main,
    Women,
    Hackathon,
    Competitive,
    Research,
}

impl FlagTag for Organization {
    const ALL: &'static [Self] = &[
        Self::Main,
        Self::Women,
        Self::Hackathon,
        Self::Competitive,
        Self::Research,
    ];

    fn tag(self) -> &'static str {
        match self {
            Self::Main => "main",
            Self::Women => "women",
            Self::Hackathon => "hackathon",
            Self::Competitive => "competitive",
            Self::Research => "research",
        }
    }

    fn flag(record: &MemberDataRecord, tag: Self) -> Option<bool> {
        match tag {
            Self::Main => record.org_main,
            Self::Women => record.org_women,
            Self::Hackathon => record.org_hackathon,
            Self::Competitive => record.org_competitive,
            Self::Research => record.org_research,
        }
    }

    fn flag_mut(record: &mut MemberDataRecord, tag: Self) -> &mut Option<bool> {
        match tag {
            Self::Main => &mut record.org_main,
            Self::Women => &mut record.org_women,
            Self::Hackathon => &mut record.org_hackathon,
            Self::Competitive => &mut record.org_competitive,
            Self::Research => &mut record.org_research,
        }
    }
}

impl TryFrom<String> for Organization {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_tag(&value).ok_or_else(|| format!("unknown organization: {value}"))
    }
}

impl std::fmt::Display for Organization {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ethnicity {
    White,
    Black,
    Hispanic,
    Asian,
    NativeAmerican,
    PacificIslander,
    Multiracial,
}

impl FlagTag for Ethnicity {
    const ALL: &'static [Self] = &[
        Self::White,
        Self::Black,
        Self::Hispanic,
        Self::Asian,
        Self::NativeAmerican,
        Self::PacificIslander,
        Self::Multiracial,
    ];

    fn tag(self) -> &'static str {
        match self {
            Self::White => "white",
            Self::Black => "black",
            Self::Hispanic => "hispanic",
            Self::Asian => "asian",
            Self::NativeAmerican => "native_american",
            Self::PacificIslander => "pacific_islander",
            Self::Multiracial => "multiracial",
        }
    }

    fn flag(record: &MemberDataRecord, tag: Self) -> Option<bool> {
        match tag {
            Self::White => record.eth_white,
            Self::Black => record.eth_black,
            Self::Hispanic => record.eth_hispanic,
            Self::Asian => record.eth_asian,
            Self::NativeAmerican => record.eth_native_american,
            Self::PacificIslander => record.eth_pacific_islander,
            Self::Multiracial => record.eth_multiracial,
        }
    }

    fn flag_mut(record: &mut MemberDataRecord, tag: Self) -> &mut Option<bool> {
        match tag {
            Self::White => &mut record.eth_white,
            Self::Black => &mut record.eth_black,
            Self::Hispanic => &mut record.eth_hispanic,
            Self::Asian => &mut record.eth_asian,
            Self::NativeAmerican => &mut record.eth_native_american,
            Self::PacificIslander => &mut record.eth_pacific_islander,
            Self::Multiracial => &mut record.eth_multiracial,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenderIdentity {
    Male,
    Female,
    NonBinary,
    Transgender,
    Intersex,
    DoesNotIdentify,
}

impl FlagTag for GenderIdentity {
    const ALL: &'static [Self] = &[
        Self::Male,
        Self::Female,
        Self::NonBinary,
        Self::Transgender,
        Self::Intersex,
        Self::DoesNotIdentify,
    ];

    fn tag(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
            Self::NonBinary => "non_binary",
            Self::Transgender => "transgender",
            Self::Intersex => "intersex",
            Self::DoesNotIdentify => "does_not_identify",
        }
    }

    fn flag(record: &MemberDataRecord, tag: Self) -> Option<bool> {
        match tag {
            Self::Male => record.gi_male,
            Self::Female => record.gi_female,
            Self::NonBinary => record.gi_non_binary,
            Self::Transgender => record.gi_transgender,
            Self::Intersex => record.gi_intersex,
            Self::DoesNotIdentify => record.gi_does_not_identify,
        }
    }

    fn flag_mut(record: &mut MemberDataRecord, tag: Self) -> &mut Option<bool> {
        match tag {
            Self::Male => &mut record.gi_male,
            Self::Female => &mut record.gi_female,
            Self::NonBinary => &mut record.gi_non_binary,
            Self::Transgender => &mut record.gi_transgender,
            Self::Intersex => &mut record.gi_intersex,
            Self::DoesNotIdentify => &mut record.gi_does_not_identify,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    Freshman,
    Sophomore,
    Junior,
    Senior,
    Graduate,
}

impl Classification {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Freshman => "freshman",
            Self::Sophomore => "sophomore",
            Self::Junior => "junior",
            Self::Senior => "senior",
            Self::Graduate => "graduate",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "freshman" => Some(Self::Freshman),
            "sophomore" => Some(Self::Sophomore),
            "junior" => Some(Self::Junior),
            "senior" => Some(Self::Senior),
            "graduate" => Some(Self::Graduate),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShirtType {
    Unisex,
    Womens,
}

impl ShirtType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unisex => "unisex",
            Self::Womens => "womens",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "unisex" => Some(Self::Unisex),
            "womens" => Some(Self::Womens),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShirtSize {
    Xs,
    S,
    M,
    L,
    Xl,
    Xxl,
}

impl ShirtSize {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Xs => "xs",
            Self::S => "s",
            Self::M => "m",
            Self::L => "l",
            Self::Xl => "xl",
            Self::Xxl => "xxl",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "xs" => Some(Self::Xs),
            "s" => Some(Self::S),
            "m" => Some(Self::M),
            "l" => Some(Self::L),
            "xl" => Some(Self::Xl),
            "xxl" => Some(Self::Xxl),
            _ => None,
        }
    }
}

/// Profile data as submitted by registration, self-service or admin edits.
///
/// A category that is absent (`None`) is left untouched in storage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemberDataInput {
    pub organizations: Option<BTreeSet<Organization>>,
    /// Single ethnicity tag; unrecognized tags are stored as "none selected"
    pub ethnicity: Option<String>,
    /// Identity tag, or free text when it matches no known tag
    pub identity: Option<String>,
    pub major: Option<String>,
    pub classification: Option<Classification>,
    pub graduation_date: Option<String>,
    pub shirt_type: Option<ShirtType>,
    pub shirt_size: Option<ShirtSize>,
    pub address: Option<String>,
}

impl MemberDataInput {
    pub fn validate(&self) -> Result<(), AppError> {
        validate_optional_text(&self.ethnicity, "ethnicity", MAX_NAME_LEN)?;
        validate_optional_text(&self.identity, "identity", MAX_NOTE_LEN)?;
        validate_optional_text(&self.major, "major", MAX_NAME_LEN)?;
        validate_optional_text(&self.graduation_date, "graduation_date", MAX_NAME_LEN)?;
        validate_optional_text(&self.address, "address", MAX_ADDRESS_LEN)?;
        Ok(())
    }
}

/// Flat storage row of the `member_data` table (minus `member_id`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct MemberDataRecord {
    pub org_main: Option<bool>,
    pub org_women: Option<bool>,
    pub org_hackathon: Option<bool>,
    pub org_competitive: Option<bool>,
    pub org_research: Option<bool>,

    pub eth_white: Option<bool>,
    pub eth_black: Option<bool>,
    pub eth_hispanic: Option<bool>,
    pub eth_asian: Option<bool>,
    pub eth_native_american: Option<bool>,
    pub eth_pacific_islander: Option<bool>,
    pub eth_multiracial: Option<bool>,

    pub gi_male: Option<bool>,
    pub gi_female: Option<bool>,
    pub gi_non_binary: Option<bool>,
    pub gi_transgender: Option<bool>,
    pub gi_intersex: Option<bool>,
    pub gi_does_not_identify: Option<bool>,
    pub other_identity: Option<String>,

    pub major: Option<String>,
    pub classification: Option<String>,
    pub graduation_date: Option<String>,
    pub shirt_type: Option<String>,
    pub shirt_size: Option<String>,
    pub address: Option<String>,
}

/// Profile as shown to API consumers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemberProfile {
    pub organizations: BTreeSet<Organization>,
    pub ethnicities: BTreeSet<Ethnicity>,
    pub identities: BTreeSet<GenderIdentity>,
    pub other_identity: Option<String>,
    pub major: Option<String>,
    pub classification: Option<Classification>,
    pub graduation_date: Option<String>,
    pub shirt_type: Option<ShirtType>,
    pub shirt_size: Option<ShirtSize>,
    pub address: Option<String>,
}

/// Write a group of flags: every flag `false`, then the selected ones `true`.
fn set_group<T: FlagTag>(record: &mut MemberDataRecord, selected: impl IntoIterator<Item = T>) {
    for &tag in T::ALL {
        *T::flag_mut(record, tag) = Some(false);
    }
    for tag in selected {
        *T::flag_mut(record, tag) = Some(true);
    }
}

/// Read back every flag that is `true`.
fn collect_group<T: FlagTag>(record: &MemberDataRecord) -> BTreeSet<T> {
    T::ALL
        .iter()
        .copied()
        .filter(|&tag| T::flag(record, tag) == Some(true))
        .collect()
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Map the pretty input onto the flat flag layout.
pub fn to_storage_record(input: &MemberDataInput) -> MemberDataRecord {
    let mut record = MemberDataRecord::default();

    // An empty set is treated like an absent one: nothing was selected.
    if let Some(orgs) = &input.organizations
        && !orgs.is_empty()
    {
        set_group(&mut record, orgs.iter().copied());
    }

    if let Some(raw) = non_blank(&input.ethnicity) {
        set_group(&mut record, Ethnicity::from_tag(raw));
    }

    if let Some(raw) = non_blank(&input.identity) {
        match GenderIdentity::from_tag(raw) {
            Some(tag) => set_group(&mut record, Some(tag)),
            None => {
                set_group(&mut record, None::<GenderIdentity>);
                record.other_identity = Some(raw.to_string());
            }
        }
    }

    record.major = input.major.clone();
    record.classification = input.classification.map(|c| c.as_str().to_string());
    record.graduation_date = input.graduation_date.clone();
    record.shirt_type = input.shirt_type.map(|s| s.as_str().to_string());
    record.shirt_size = input.shirt_size.map(|s| s.as_str().to_string());
    record.address = input.address.clone();
    record
}

/// Collect `true` flags back into tag sets.
pub fn to_pretty_record(record: &MemberDataRecord) -> MemberProfile {
    MemberProfile {
        organizations: collect_group(record),
        ethnicities: collect_group(record),
        identities: collect_group(record),
        other_identity: record.other_identity.clone(),
        major: record.major.clone(),
        classification: record.classification.as_deref().and_then(Classification::parse),
        graduation_date: record.graduation_date.clone(),
        shirt_type: record.shirt_type.as_deref().and_then(ShirtType::parse),
        shirt_size: record.shirt_size.as_deref().and_then(ShirtSize::parse),
        address: record.address.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn orgs(tags: &[Organization]) -> Option<BTreeSet<Organization>> {
        Some(tags.iter().copied().collect())
    }

    #[test]
    fn absent_categories_stay_null() {
        let record = to_storage_record(&MemberDataInput::default());
        for &org in Organization::ALL {
            assert_eq!(Organization::flag(&record, org), None);
        }
        for &eth in Ethnicity::ALL {
            assert_eq!(Ethnicity::flag(&record, eth), None);
        }
        for &gi in GenderIdentity::ALL {
            assert_eq!(GenderIdentity::flag(&record, gi), None);
        }
        assert_eq!(record.other_identity, None);
    }

    #[test]
    fn organizations_backfill_false() {
        let input = MemberDataInput {
            organizations: orgs(&[Organization::Women, Organization::Research]),
            ..Default::default()
        };
        let record = to_storage_record(&input);
        assert_eq!(record.org_women, Some(true));
        assert_eq!(record.org_research, Some(true));
        assert_eq!(record.org_main, Some(false));
        assert_eq!(record.org_hackathon, Some(false));
        assert_eq!(record.org_competitive, Some(false));
    }

    #[test]
    fn empty_organization_set_is_untouched() {
        let input = MemberDataInput {
            organizations: Some(BTreeSet::new()),
            ..Default::default()
        };
        let record = to_storage_record(&input);
        assert_eq!(record.org_main, None);
    }

    #[test]
    fn ethnicity_is_exclusive() {
        let input = MemberDataInput {
            ethnicity: Some("Hispanic".into()),
            ..Default::default()
        };
        let record = to_storage_record(&input);
        let set: Vec<_> = Ethnicity::ALL
            .iter()
            .filter(|&&e| Ethnicity::flag(&record, e) == Some(true))
            .collect();
        assert_eq!(set, vec![&Ethnicity::Hispanic]);
        assert_eq!(record.eth_white, Some(false));
    }

    #[test]
    fn unknown_ethnicity_sets_all_false() {
        let input = MemberDataInput {
            ethnicity: Some("martian".into()),
            ..Default::default()
        };
        let record = to_storage_record(&input);
        for &eth in Ethnicity::ALL {
            assert_eq!(Ethnicity::flag(&record, eth), Some(false));
        }
    }

    #[test]
    fn unknown_identity_goes_to_other() {
        let input = MemberDataInput {
            identity: Some("Two-Spirit".into()),
            ..Default::default()
        };
        let record = to_storage_record(&input);
        assert_eq!(record.other_identity.as_deref(), Some("Two-Spirit"));
        for &gi in GenderIdentity::ALL {
            assert_eq!(GenderIdentity::flag(&record, gi), Some(false));
        }

        let profile = to_pretty_record(&record);
        assert!(profile.identities.is_empty());
        assert_eq!(profile.other_identity.as_deref(), Some("Two-Spirit"));
    }

    #[test]
    fn known_identity_sets_single_flag() {
        let input = MemberDataInput {
            identity: Some("non_binary".into()),
            ..Default::default()
        };
        let record = to_storage_record(&input);
        assert_eq!(record.gi_non_binary, Some(true));
        assert_eq!(record.gi_male, Some(false));
        assert_eq!(record.other_identity, None);
    }

    #[test]
    fn round_trip_known_tags() {
        let input = MemberDataInput {
            organizations: orgs(&[
                Organization::Research,
                Organization::Main,
                Organization::Hackathon,
            ]),
            ethnicity: Some("asian".into()),
            identity: Some("female".into()),
            major: Some("Computer Science".into()),
            classification: Some(Classification::Junior),
            graduation_date: Some("May 2026".into()),
            shirt_type: Some(ShirtType::Unisex),
            shirt_size: Some(ShirtSize::Xl),
            address: None,
        };
        let profile = to_pretty_record(&to_storage_record(&input));

        assert_eq!(Some(profile.organizations.clone()), input.organizations);
        assert_eq!(
            profile.ethnicities.into_iter().collect::<Vec<_>>(),
            vec![Ethnicity::Asian]
        );
        assert_eq!(
            profile.identities.into_iter().collect::<Vec<_>>(),
            vec![GenderIdentity::Female]
        );
        assert_eq!(profile.classification, Some(Classification::Junior));
        assert_eq!(profile.shirt_size, Some(ShirtSize::Xl));
        assert_eq!(profile.major.as_deref(), Some("Computer Science"));
    }

    #[test]
    fn every_single_tag_round_trips() {
        for &eth in Ethnicity::ALL {
            let input = MemberDataInput {
                ethnicity: Some(eth.tag().to_string()),
                ..Default::default()
            };
            let profile = to_pretty_record(&to_storage_record(&input));
            assert_eq!(profile.ethnicities, BTreeSet::from([eth]));
        }
        for &gi in GenderIdentity::ALL {
            let input = MemberDataInput {
                identity: Some(gi.tag().to_string()),
                ..Default::default()
            };
            let profile = to_pretty_record(&to_storage_record(&input));
            assert_eq!(profile.identities, BTreeSet::from([gi]));
            assert_eq!(profile.other_identity, None);
        }
    }

    #[test]
    fn organization_wire_names_match_tags() {
        for &org in Organization::ALL {
            let json = serde_json::to_string(&org).unwrap();
            assert_eq!(json, format!("\"{}\"", org.tag()));
            assert_eq!(Organization::try_from(org.tag().to_uppercase()), Ok(org));
        }
        assert!(Organization::try_from("chess".to_string()).is_err());
    }
}
