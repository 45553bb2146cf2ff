//! Host shell seam: the surface a mini-app container offers the form.

use serde::{Deserialize, Serialize};
use shared::domain::CreatorIdentity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupButton {
    Ok,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Popup {
    pub title: String,
    pub message: String,
    pub buttons: Vec<PopupButton>,
}

impl Popup {
    pub fn ok(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            buttons: vec![PopupButton::Ok],
        }
    }
}

/// Theme colors reported by the host. Any of them may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeParams {
    #[serde(default)]
    pub bg_color: Option<String>,
    #[serde(default)]
    pub text_color: Option<String>,
    #[serde(default)]
    pub hint_color: Option<String>,
    #[serde(default)]
    pub link_color: Option<String>,
    #[serde(default)]
    pub button_color: Option<String>,
    #[serde(default)]
    pub button_text_color: Option<String>,
}

impl ThemeParams {
    /// CSS custom properties for the colors that are set.
    pub fn css_variables(&self) -> Vec<(&'static str, &str)> {
        [
            ("--tg-theme-bg-color", &self.bg_color),
            ("--tg-theme-text-color", &self.text_color),
            ("--tg-theme-hint-color", &self.hint_color),
            ("--tg-theme-link-color", &self.link_color),
            ("--tg-theme-button-color", &self.button_color),
            ("--tg-theme-button-text-color", &self.button_text_color),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.as_deref().map(|value| (name, value)))
        .collect()
    }
}

/// User fields as handed over by the host. None of them are verified.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShellUser {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

impl ShellUser {
    pub fn creator(&self) -> Option<CreatorIdentity> {
        CreatorIdentity::from_untrusted(
            self.id,
            self.first_name.as_deref(),
            self.last_name.as_deref(),
            self.username.as_deref(),
        )
    }
}

/// Notifications the host delivers to the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    MainButtonPressed,
    ThemeChanged,
}

pub trait HostShell: Send + Sync {
    fn expand(&self);
    fn enable_closing_confirmation(&self);
    fn theme(&self) -> ThemeParams;
    fn show_popup(&self, popup: Popup);
    fn set_main_button_text(&self, text: &str);
    fn show_main_button(&self);
    fn hide_main_button(&self);
    fn user(&self) -> Option<ShellUser>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn css_variables_skip_missing_colors() {
        let theme = ThemeParams {
            bg_color: Some("#ffffff".into()),
            button_text_color: Some("#000000".into()),
            ..ThemeParams::default()
        };

        assert_eq!(
            theme.css_variables(),
            vec![
                ("--tg-theme-bg-color", "#ffffff"),
                ("--tg-theme-button-text-color", "#000000"),
            ]
        );
    }

    #[test]
    fn shell_user_without_id_has_no_creator() {
        let user = ShellUser {
            first_name: Some("Ada".into()),
            ..ShellUser::default()
        };
        assert!(user.creator().is_none());
    }
}
