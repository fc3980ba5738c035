//! Every registered command is listed by `/help`, and names stay unique.
use krakendeals_bot::commands::CommandRegistry;
use krakendeals_bot::commands::help::listed_usages;

#[test]
fn registry_holds_the_command_surface() {
    let registry = CommandRegistry::standard();
    assert_eq!(registry.names(), vec!["config", "help", "ping", "price"]);
    assert_eq!(registry.definitions().len(), 4);
}

#[test]
fn help_lists_every_command() {
    let usages = listed_usages();
    for name in CommandRegistry::standard().names() {
        let slash = format!("/{name}");
        assert!(
            usages
                .iter()
                .any(|u| *u == slash || u.starts_with(&format!("{slash} "))),
            "Missing help entry for `{}`",
            name
        );
    }
}

#[test]
fn help_entries_unique() {
    let mut usages = listed_usages();
    usages.sort();
    for w in usages.windows(2) {
        assert_ne!(w[0], w[1], "Duplicate help entry: {}", w[0]);
    }
}
