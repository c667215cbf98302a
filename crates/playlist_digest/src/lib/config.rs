//! Run configuration and credential resolution.

use std::fmt;

use crate::{error::Error, prompt::DEFAULT_USER_PROMPT};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PromptMode {
    #[default]
    Default,
    Custom,
}

/// Everything the caller supplies for one run. Read-only once the run starts.
#[derive(Clone, Default, PartialEq)]
pub struct RunConfiguration {
    pub api_key: String,
    /// Playlist URL or bare list id.
    pub playlist: String,
    /// Free text; several topics may be given comma separated.
    pub topic: String,
    pub prompt_mode: PromptMode,
    /// Only read when `prompt_mode` is [`PromptMode::Custom`].
    pub custom_prompt: String,
}

impl RunConfiguration {
    pub fn validate(&self) -> Result<(), Error> {
        if self.api_key.trim().is_empty() {
            return Err(Error::MissingConfiguration("API key"));
        }
        if self.playlist.trim().is_empty() {
            return Err(Error::MissingConfiguration("playlist URL or id"));
        }
        if self.topic.trim().is_empty() {
            return Err(Error::MissingConfiguration("topic"));
        }
        if self.prompt_mode == PromptMode::Custom && self.custom_prompt.trim().is_empty() {
            return Err(Error::MissingConfiguration("custom prompt"));
        }
        Ok(())
    }

    /// The template prefixed to every compiled prompt.
    pub fn user_prompt(&self) -> &str {
        match self.prompt_mode {
            PromptMode::Default => DEFAULT_USER_PROMPT,
            PromptMode::Custom => &self.custom_prompt,
        }
    }
}

impl fmt::Debug for RunConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunConfiguration")
            .field("api_key", &"<redacted>")
            .field("playlist", &self.playlist)
            .field("topic", &self.topic)
            .field("prompt_mode", &self.prompt_mode)
            .field("custom_prompt", &self.custom_prompt)
            .finish()
    }
}

/// Lets operators hand out a password that unlocks a pre-provisioned API key.
#[derive(Clone, Default)]
pub struct CredentialPolicy {
    special_password: Option<String>,
    privileged_api_key: Option<String>,
}

impl CredentialPolicy {
    pub fn new(special_password: Option<String>, privileged_api_key: Option<String>) -> Self {
        let non_blank = |value: Option<String>| value.filter(|v| !v.trim().is_empty());
        Self {
            special_password: non_blank(special_password),
            privileged_api_key: non_blank(privileged_api_key),
        }
    }

    /// Returns the key to use for `supplied`: the privileged key when `supplied` is the
    /// special password, otherwise `supplied` itself.
    pub fn resolve(&self, supplied: &str) -> Result<String, Error> {
        match &self.special_password {
            Some(password) if password == supplied => {
                tracing::info!("Special password supplied, using the privileged API key");
                self.privileged_api_key
                    .clone()
                    .ok_or(Error::MissingConfiguration("privileged API key"))
            }
            _ => Ok(supplied.to_string()),
        }
    }
}

impl fmt::Debug for CredentialPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialPolicy")
            .field("special_password", &self.special_password.as_ref().map(|_| "<redacted>"))
            .field(
                "privileged_api_key",
                &self.privileged_api_key.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> RunConfiguration {
        RunConfiguration {
            api_key: "sk-test".into(),
            playlist: "PL123".into(),
            topic: "cooking".into(),
            ..Default::default()
        }
    }

    #[test]
    fn complete_configuration_validates() {
        assert!(config().validate().is_ok());
    }

    #[test]
    fn missing_fields_are_reported() {
        let cases = [
            RunConfiguration {
                api_key: " ".into(),
                ..config()
            },
            RunConfiguration {
                playlist: String::new(),
                ..config()
            },
            RunConfiguration {
                topic: String::new(),
                ..config()
            },
            RunConfiguration {
                prompt_mode: PromptMode::Custom,
                ..config()
            },
        ];

        for case in cases {
            assert!(
                matches!(case.validate(), Err(Error::MissingConfiguration(_))),
                "{case:?}"
            );
        }
    }

    #[test]
    fn user_prompt_follows_mode() {
        let default = config();
        assert_eq!(default.user_prompt(), DEFAULT_USER_PROMPT);

        let custom = RunConfiguration {
            prompt_mode: PromptMode::Custom,
            custom_prompt: "Answer strictly: ".into(),
            ..config()
        };
        assert_eq!(custom.user_prompt(), "Answer strictly: ");

        // A custom prompt is ignored unless custom mode is on
        let ignored = RunConfiguration {
            custom_prompt: "unused".into(),
            ..config()
        };
        assert_eq!(ignored.user_prompt(), DEFAULT_USER_PROMPT);
    }

    #[test]
    fn debug_output_redacts_the_key() {
        let rendered = format!("{:?}", config());
        assert!(!rendered.contains("sk-test"));
    }

    #[test]
    fn special_password_unlocks_privileged_key() {
        let policy = CredentialPolicy::new(Some("open sesame".into()), Some("sk-privileged".into()));

        assert_eq!(policy.resolve("open sesame").unwrap(), "sk-privileged");
        assert_eq!(policy.resolve("sk-mine").unwrap(), "sk-mine");
    }

    #[test]
    fn special_password_without_privileged_key_is_missing_configuration() {
        let policy = CredentialPolicy::new(Some("open sesame".into()), None);
        assert!(matches!(
            policy.resolve("open sesame"),
            Err(Error::MissingConfiguration(_))
        ));

        let unset = CredentialPolicy::default();
        assert_eq!(unset.resolve("").unwrap(), "");
    }
}
