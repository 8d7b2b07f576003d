use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::contract::UserProfile;

pub const UPDATED_AT_ATTRIBUTE: &str = "UpdatedAt";

type FieldAccessor = fn(&UserProfile) -> &str;

/// Mirrored profile attributes, in the order their clauses are emitted.
pub const PROFILE_FIELDS: [(&str, FieldAccessor); 7] = [
    ("DisplayName", |profile| profile.display_name.as_str()),
    ("Bio", |profile| profile.bio.as_str()),
    ("ProfilePicture", |profile| profile.profile_picture.as_str()),
    ("ProfileBanner", |profile| profile.profile_banner.as_str()),
    ("Theme", |profile| profile.theme.as_str()),
    ("PrimaryColor", |profile| profile.primary_color.as_str()),
    ("SecondaryColor", |profile| profile.secondary_color.as_str()),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateDescriptor {
    clauses: Vec<String>,
    values: BTreeMap<String, String>,
}

impl UpdateDescriptor {
    /// Clauses joined with `", "`, without the leading `SET`.
    pub fn expression(&self) -> String {
        self.clauses.join(", ")
    }

    pub fn clauses(&self) -> &[String] {
        &self.clauses
    }

    /// Placeholder bindings keyed as `:<Attribute>`.
    pub fn values(&self) -> &BTreeMap<String, String> {
        &self.values
    }

    pub fn into_values(self) -> BTreeMap<String, String> {
        self.values
    }

    /// `false` when only the server-set timestamp would be written.
    pub fn has_user_fields(&self) -> bool {
        self.values.len() > 1
    }
}

pub fn build_update_descriptor(profile: &UserProfile) -> UpdateDescriptor {
    build_update_descriptor_at(profile, Utc::now())
}

pub fn build_update_descriptor_at(profile: &UserProfile, now: DateTime<Utc>) -> UpdateDescriptor {
    let mut clauses = Vec::with_capacity(PROFILE_FIELDS.len() + 1);
    let mut values = BTreeMap::new();

    for (attribute, accessor) in PROFILE_FIELDS {
        let value = accessor(profile);
        if value.is_empty() {
            continue;
        }
        clauses.push(assignment_clause(attribute));
        values.insert(placeholder(attribute), value.to_string());
    }

    clauses.push(assignment_clause(UPDATED_AT_ATTRIBUTE));
    values.insert(
        placeholder(UPDATED_AT_ATTRIBUTE),
        now.to_rfc3339_opts(SecondsFormat::Secs, true),
    );

    UpdateDescriptor { clauses, values }
}

fn assignment_clause(attribute: &str) -> String {
    format!("{attribute} = {}", placeholder(attribute))
}

fn placeholder(attribute: &str) -> String {
    format!(":{attribute}")
}
