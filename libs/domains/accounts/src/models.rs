use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::fmt::Debug;

/// Contract shared by every account kind served by this crate.
///
/// Entities travel as `{"id", "email", "username", "passwordHash"}`. Absent fields
/// decode as empty strings, which is what lets a full update blank out fields the
/// client did not send.
pub trait Entity:
    Debug + Clone + Default + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Singular name used in logs (`user`, `admin`).
    const KIND: &'static str;

    /// Collection the kind is stored in unless configured otherwise.
    const COLLECTION: &'static str;

    fn from_fields(id: String, email: String, username: String, password_hash: String) -> Self;

    fn id(&self) -> &str;
    fn set_id(&mut self, id: String);
    fn email(&self) -> &str;
    fn username(&self) -> &str;
    fn password_hash(&self) -> &str;

    /// True when `email`, `username` and `passwordHash` are all non-empty.
    fn has_required_fields(&self) -> bool {
        !self.email().is_empty() && !self.username().is_empty() && !self.password_hash().is_empty()
    }

    /// True when a partial update carries nothing to write.
    fn is_blank_patch(&self) -> bool {
        self.email().is_empty() && self.username().is_empty() && self.password_hash().is_empty()
    }

    /// Overwrite the fields that are non-empty in `patch`, keep the rest.
    fn apply_patch(&mut self, patch: &Self) {
        let pick = |new: &str, old: &str| {
            if new.is_empty() { old.to_string() } else { new.to_string() }
        };
        *self = Self::from_fields(
            self.id().to_string(),
            pick(patch.email(), self.email()),
            pick(patch.username(), self.username()),
            pick(patch.password_hash(), self.password_hash()),
        );
    }
}

macro_rules! account_entity {
    ($(#[$meta:meta])* $name:ident, kind = $kind:literal, collection = $collection:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(default)]
        pub struct $name {
            /// Store-assigned identifier, empty until created
            pub id: String,
            pub email: String,
            pub username: String,
            #[serde(rename = "passwordHash")]
            pub password_hash: String,
        }

        impl Entity for $name {
            const KIND: &'static str = $kind;
            const COLLECTION: &'static str = $collection;

            fn from_fields(
                id: String,
                email: String,
                username: String,
                password_hash: String,
            ) -> Self {
                Self {
                    id,
                    email,
                    username,
                    password_hash,
                }
            }

            fn id(&self) -> &str {
                &self.id
            }

            fn set_id(&mut self, id: String) {
                self.id = id;
            }

            fn email(&self) -> &str {
                &self.email
            }

            fn username(&self) -> &str {
                &self.username
            }

            fn password_hash(&self) -> &str {
                &self.password_hash
            }
        }
    };
}

account_entity!(
    /// Regular user account
    User,
    kind = "user",
    collection = "users"
);

account_entity!(
    /// Administrator account
    Admin,
    kind = "admin",
    collection = "admins"
);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn user(email: &str, username: &str, password_hash: &str) -> User {
        User::from_fields(
            String::new(),
            email.to_string(),
            username.to_string(),
            password_hash.to_string(),
        )
    }

    #[test]
    fn test_missing_fields_decode_as_empty() {
        let decoded: User = serde_json::from_value(json!({ "email": "a@b.c" })).unwrap();
        assert_eq!(decoded.email, "a@b.c");
        assert!(decoded.id.is_empty());
        assert!(decoded.username.is_empty());
        assert!(decoded.password_hash.is_empty());
        assert!(!decoded.has_required_fields());
    }

    #[test]
    fn test_password_hash_uses_camel_case_on_the_wire() {
        let value = serde_json::to_value(user("a@b.c", "ann", "h1")).unwrap();
        assert_eq!(value["passwordHash"], "h1");
        assert!(value.get("password_hash").is_none());
        assert_eq!(value["id"], "");
    }

    #[test]
    fn test_has_required_fields() {
        assert!(user("a@b.c", "ann", "h1").has_required_fields());
        assert!(!user("", "ann", "h1").has_required_fields());
        assert!(!user("a@b.c", "", "h1").has_required_fields());
        assert!(!user("a@b.c", "ann", "").has_required_fields());
    }

    #[test]
    fn test_apply_patch_keeps_empty_fields() {
        let mut stored = user("old@b.c", "ann", "h1");
        stored.set_id("65a1f0c2e4b0a1b2c3d4e5f6".to_string());

        stored.apply_patch(&user("new@b.c", "", ""));

        assert_eq!(stored.id, "65a1f0c2e4b0a1b2c3d4e5f6");
        assert_eq!(stored.email, "new@b.c");
        assert_eq!(stored.username, "ann");
        assert_eq!(stored.password_hash, "h1");
    }

    #[test]
    fn test_blank_patch() {
        assert!(User::default().is_blank_patch());
        assert!(!user("", "", "h2").is_blank_patch());
    }

    #[test]
    fn test_kinds_use_distinct_collections() {
        assert_eq!(User::COLLECTION, "users");
        assert_eq!(Admin::COLLECTION, "admins");
        assert_ne!(User::KIND, Admin::KIND);
    }
}
