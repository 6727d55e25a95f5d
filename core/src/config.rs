//! Client configuration, explicit or read from the environment.

use uuid::Uuid;

use crate::client::ResourceClient;
use crate::error::ConfigError;
use crate::resource::{Posts, Tasks, Users};

pub const BASE_URL_VAR: &str = "TASKBOARD_API_URL";
pub const ACTOR_VAR: &str = "TASKBOARD_ACTOR_ID";
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    /// Recorded as `actorUserId` on post updates.
    pub actor_user_id: Option<Uuid>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            actor_user_id: None,
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            actor_user_id: None,
        }
    }

    pub fn with_actor(mut self, actor: Uuid) -> Self {
        self.actor_user_id = Some(actor);
        self
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from an arbitrary variable lookup; unset or blank variables
    /// fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |var: &str| lookup(var).filter(|value| !value.trim().is_empty());

        let base_url = match read(BASE_URL_VAR) {
            None => DEFAULT_BASE_URL.to_string(),
            Some(value) if value.starts_with("http://") || value.starts_with("https://") => value,
            Some(value) => {
                return Err(ConfigError::InvalidBaseUrl {
                    var: BASE_URL_VAR,
                    value,
                })
            }
        };

        let actor_user_id = read(ACTOR_VAR)
            .map(|value| {
                value.trim().parse::<Uuid>().map_err(|_| ConfigError::InvalidActor {
                    var: ACTOR_VAR,
                    value,
                })
            })
            .transpose()?;

        Ok(Self {
            base_url,
            actor_user_id,
        })
    }

    pub fn tasks(&self) -> ResourceClient<Tasks> {
        ResourceClient::new(&self.base_url)
    }

    /// Post updates carry the configured actor for auditing.
    pub fn posts(&self) -> ResourceClient<Posts> {
        let client = ResourceClient::new(&self.base_url);
        match self.actor_user_id {
            Some(actor) => client.with_actor(actor),
            None => client,
        }
    }

    pub fn users(&self) -> ResourceClient<Users> {
        ResourceClient::new(&self.base_url)
    }
}
