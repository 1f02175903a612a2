//! Connection identity
//!
//! The realtime endpoint is addressed per user and role; the pair also keys
//! the connection registry.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Platform role of the connected user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Customer,
    Driver,
    Admin,
}

impl Role {
    /// Wire string used in the endpoint query and in config files
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "customer",
            Role::Driver => "driver",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(Role::Customer),
            "driver" => Ok(Role::Driver),
            "admin" => Ok(Role::Admin),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

/// The (user id, role) pair that keys a realtime connection
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: String,
    pub role: Role,
}

impl Identity {
    pub fn new(user_id: impl Into<String>, role: Role) -> Self {
        Self {
            user_id: user_id.into(),
            role,
        }
    }

    /// Build the realtime endpoint URL for this identity
    ///
    /// The server addresses connections purely through the query string;
    /// there is no message-level handshake after the transport opens.
    pub fn endpoint_url(&self, ws_base_url: &str) -> String {
        format!(
            "{}/ws?userId={}&role={}",
            ws_base_url.trim_end_matches('/'),
            self.user_id,
            self.role
        )
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.user_id, self.role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_url_carries_user_and_role() {
        let identity = Identity::new("u-42", Role::Admin);
        assert_eq!(
            identity.endpoint_url("wss://api.cargolink.example"),
            "wss://api.cargolink.example/ws?userId=u-42&role=admin"
        );
    }

    #[test]
    fn endpoint_url_tolerates_trailing_slash() {
        let identity = Identity::new("u-1", Role::Customer);
        assert_eq!(
            identity.endpoint_url("ws://localhost:4000/"),
            "ws://localhost:4000/ws?userId=u-1&role=customer"
        );
    }

    #[test]
    fn role_round_trips_through_wire_string() {
        for role in [Role::Customer, Role::Driver, Role::Admin] {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
        assert!("superuser".parse::<Role>().is_err());
    }
}
