//! Server settings form: two single-choice fields pre-selected from the
//! current preferences, rendered as select menus.

use crate::preferences::{Currency, PreferenceUpdate, ServerPreferences};
use serenity::builder::{
    CreateActionRow, CreateSelectMenu, CreateSelectMenuKind, CreateSelectMenuOption,
};

// Component custom_ids. Everything under the prefix is routed to the config handler.
pub const CONFIG_FORM_PREFIX: &str = "config_";
pub const KEYSHOPS_SELECT: &str = "config_allow_keyshops";
pub const CURRENCY_SELECT: &str = "config_currency";

pub const FORM_TITLE: &str = "KrakenDeals Server Configuration";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceOption {
    pub label: &'static str,
    pub description: &'static str,
    pub value: &'static str,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceField {
    pub custom_id: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    pub placeholder: &'static str,
    pub options: Vec<ChoiceOption>,
}

impl ChoiceField {
    pub fn selected(&self) -> Option<&ChoiceOption> {
        self.options.iter().find(|o| o.selected)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormDescriptor {
    pub title: &'static str,
    pub fields: Vec<ChoiceField>,
}

impl FormDescriptor {
    pub fn field(&self, custom_id: &str) -> Option<&ChoiceField> {
        self.fields.iter().find(|f| f.custom_id == custom_id)
    }

    /// Message text shown above the menus.
    pub fn summary(&self) -> String {
        let mut out = format!("**{}**", self.title);
        for f in &self.fields {
            out.push_str(&format!("\n• **{}**: {}", f.label, f.description));
        }
        out
    }

    pub fn to_components(&self) -> Vec<CreateActionRow> {
        self.fields
            .iter()
            .map(|field| {
                let options = field
                    .options
                    .iter()
                    .map(|o| {
                        CreateSelectMenuOption::new(o.label, o.value)
                            .description(o.description)
                            .default_selection(o.selected)
                    })
                    .collect();
                CreateActionRow::SelectMenu(
                    CreateSelectMenu::new(field.custom_id, CreateSelectMenuKind::String { options })
                        .placeholder(field.placeholder)
                        .min_values(1)
                        .max_values(1),
                )
            })
            .collect()
    }
}

pub fn build_config_form(prefs: &ServerPreferences) -> FormDescriptor {
    let keyshops = ChoiceField {
        custom_id: KEYSHOPS_SELECT,
        label: "Allow Keyshops",
        description: "Choose whether to allow or disallow keyshops in deal results",
        placeholder: "Select to allow or disallow keyshops",
        options: vec![
            ChoiceOption {
                label: "Allow Keyshops",
                description: "Allow deals from keyshops",
                value: "true",
                selected: prefs.allow_keyshops == Some(true),
            },
            ChoiceOption {
                label: "Disallow Keyshops",
                description: "Disallow deals from keyshops",
                value: "false",
                selected: prefs.allow_keyshops == Some(false),
            },
        ],
    };

    let current = prefs.currency_or_default();
    let currency = ChoiceField {
        custom_id: CURRENCY_SELECT,
        label: "Preferred Currency",
        description: "Select your preferred currency for deal prices",
        placeholder: "Select your preferred currency",
        options: Currency::ALL
            .iter()
            .map(|c| ChoiceOption {
                label: c.code(),
                description: c.long_name(),
                value: c.code(),
                selected: *c == current,
            })
            .collect(),
    };

    FormDescriptor {
        title: FORM_TITLE,
        fields: vec![keyshops, currency],
    }
}

/// Map a menu selection back to the preference it changes.
pub fn parse_selection(custom_id: &str, value: &str) -> Option<PreferenceUpdate> {
    match custom_id {
        KEYSHOPS_SELECT => match value {
            "true" => Some(PreferenceUpdate::AllowKeyshops(true)),
            "false" => Some(PreferenceUpdate::AllowKeyshops(false)),
            _ => None,
        },
        CURRENCY_SELECT => value.parse::<Currency>().ok().map(PreferenceUpdate::Currency),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preferences::DEFAULT_PREFERENCES;

    #[test]
    fn defaults_preselect_allow_and_gbp() {
        let form = build_config_form(&DEFAULT_PREFERENCES);
        assert_eq!(form.field(KEYSHOPS_SELECT).unwrap().selected().unwrap().value, "true");
        assert_eq!(form.field(CURRENCY_SELECT).unwrap().selected().unwrap().value, "GBP");
    }

    #[test]
    fn stored_values_preselected() {
        let prefs = ServerPreferences {
            allow_keyshops: Some(false),
            currency: Some(Currency::Eur),
        };
        let form = build_config_form(&prefs);
        assert_eq!(form.field(KEYSHOPS_SELECT).unwrap().selected().unwrap().value, "false");
        let currency = form.field(CURRENCY_SELECT).unwrap();
        assert_eq!(currency.options.iter().filter(|o| o.selected).count(), 1);
        assert_eq!(currency.selected().unwrap().value, "EUR");
    }

    #[test]
    fn partial_record_leaves_keyshops_unselected_and_currency_gbp() {
        let form = build_config_form(&ServerPreferences::empty());
        assert!(form.field(KEYSHOPS_SELECT).unwrap().selected().is_none());
        assert_eq!(form.field(CURRENCY_SELECT).unwrap().selected().unwrap().value, "GBP");
    }

    #[test]
    fn selections_parse_to_updates() {
        assert_eq!(
            parse_selection(KEYSHOPS_SELECT, "false"),
            Some(PreferenceUpdate::AllowKeyshops(false))
        );
        assert_eq!(
            parse_selection(CURRENCY_SELECT, "USD"),
            Some(PreferenceUpdate::Currency(Currency::Usd))
        );
        assert_eq!(parse_selection(CURRENCY_SELECT, "JPY"), None);
        assert_eq!(parse_selection("config_other", "true"), None);
    }

    #[test]
    fn one_menu_per_field() {
        let form = build_config_form(&DEFAULT_PREFERENCES);
        assert_eq!(form.to_components().len(), 2);
        assert!(form.summary().starts_with("**KrakenDeals Server Configuration**"));
    }
}
