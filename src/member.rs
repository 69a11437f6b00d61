//! Member record and the columns that can be searched or edited.
//!
use serde::{Deserialize, Deserializer, Serialize};

/// One row of the member list as served by the data source.
///
/// `id` is a display sequence number: it is recompacted to `1..N` after every
/// delete, so it must not be used as a stable identity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: u32,
    pub name: String,
    pub email: String,
    pub role: String,
}

impl Member {
    pub fn new(
        id: u32,
        name: impl Into<String>,
        email: impl Into<String>,
        role: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            role: role.into(),
        }
    }

    /// Borrow the value of a single column.
    pub fn field(&self, field: MemberField) -> &str {
        match field {
            MemberField::Name => &self.name,
            MemberField::Email => &self.email,
            MemberField::Role => &self.role,
        }
    }

    /// Mutable access to a single column, used by the inline editor.
    pub fn field_mut(&mut self, field: MemberField) -> &mut String {
        match field {
            MemberField::Name => &mut self.name,
            MemberField::Email => &mut self.email,
            MemberField::Role => &mut self.role,
        }
    }
}

/// The source serves ids as numeric strings ("1"), but plain numbers are accepted too.
fn deserialize_id<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Num(u32),
        Text(String),
    }

    match RawId::deserialize(deserializer)? {
        RawId::Num(n) => Ok(n),
        RawId::Text(s) => s
            .trim()
            .parse::<u32>()
            .map_err(|e| serde::de::Error::custom(format!("invalid member id '{s}': {e}"))),
    }
}

/// Column selector shared by the search box and the inline editor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum MemberField {
    #[default]
    Name,
    Email,
    Role,
}

impl MemberField {
    pub const ALL: [MemberField; 3] = [MemberField::Name, MemberField::Email, MemberField::Role];

    pub fn label(self) -> &'static str {
        match self {
            MemberField::Name => "Name",
            MemberField::Email => "Email",
            MemberField::Role => "Role",
        }
    }

    /// Next column in Name -> Email -> Role order, wrapping around.
    pub fn next(self) -> Self {
        match self {
            MemberField::Name => MemberField::Email,
            MemberField::Email => MemberField::Role,
            MemberField::Role => MemberField::Name,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            MemberField::Name => MemberField::Role,
            MemberField::Email => MemberField::Name,
            MemberField::Role => MemberField::Email,
        }
    }
}
