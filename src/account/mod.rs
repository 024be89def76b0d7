//! Account domain: identifiers, persisted document and view model.
mod key;
mod validator;

pub use key::*;
pub use validator::*;

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Collection holding every [`AccountDocument`].
pub const ACCOUNTS_COLLECTION: &str = "accounts";

/// Value object of a server-generated account identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(Uuid);

impl AccountId {
    /// Wrap an already generated [`Uuid`].
    pub fn new(id: Uuid) -> Self {
        Self(id)
    }

    /// Converts a string into a valid [`AccountId`].
    ///
    /// # Errors
    ///
    /// Returns `Err` if the string is not an hyphenated or simple UUID.
    pub fn parse(id: &str) -> Result<Self, uuid::Error> {
        Uuid::parse_str(id.trim()).map(Self)
    }

    #[inline]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

/// Account as saved on the document store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountDocument {
    pub id: AccountId,
    pub name: String,
    pub name_key: String,
    pub created_date: DateTime<Utc>,
}

impl AccountDocument {
    /// Build a document from a display name.
    ///
    /// `name_key` is always derived from `name` here and never accepted from
    /// the caller.
    pub fn new(id: AccountId, name: impl Into<String>, created_date: DateTime<Utc>) -> Self {
        let name = name.into();
        Self {
            id,
            name_key: name_key(&name),
            name,
            created_date,
        }
    }
}

/// Account domain model exposed to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: AccountId,
    pub name: String,
    pub name_key: String,
    pub created_date: DateTime<Utc>,
}

impl From<AccountDocument> for Account {
    fn from(document: AccountDocument) -> Self {
        Self {
            id: document.id,
            name: document.name,
            name_key: document.name_key,
            created_date: document.created_date,
        }
    }
}

/// Response projection of an [`Account`] with caller capabilities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountViewModel {
    pub account: Account,
    pub delete_enabled: bool,
    pub edit_enabled: bool,
}

impl AccountViewModel {
    /// Wrap an [`Account`]. Capabilities stay disabled until authorization
    /// exists.
    pub fn new(account: Account) -> Self {
        Self {
            account,
            delete_enabled: false,
            edit_enabled: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_document_derives_name_key() {
        let id = AccountId::new(Uuid::new_v4());
        let date = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let document = AccountDocument::new(id, "Acme  Corp", date);

        assert_eq!(document.name, "Acme  Corp");
        assert_eq!(document.name_key, "acme corp");
        assert_eq!(document.created_date, date);
    }

    #[test]
    fn test_document_wire_format() {
        let id = AccountId::parse("0b3c5a2e-6a8f-4d0b-9c1e-1f2a3b4c5d6e").unwrap();
        let date = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let json = serde_json::to_value(AccountDocument::new(id, "Acme Corp", date)).unwrap();

        assert_eq!(json["id"], "0b3c5a2e-6a8f-4d0b-9c1e-1f2a3b4c5d6e");
        assert_eq!(json["nameKey"], "acme corp");
        assert_eq!(json["createdDate"], "2024-03-01T12:00:00Z");
    }

    #[test]
    fn test_view_model_flags_disabled() {
        let date = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let document = AccountDocument::new(AccountId::new(Uuid::new_v4()), "Acme", date);
        let view = AccountViewModel::new(document.into());

        assert!(!view.delete_enabled);
        assert!(!view.edit_enabled);

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["deleteEnabled"], false);
        assert_eq!(json["editEnabled"], false);
    }

    #[test]
    fn test_account_id_parse() {
        assert!(AccountId::parse("not-a-uuid").is_err());
        assert!(AccountId::parse("").is_err());
    }
}
