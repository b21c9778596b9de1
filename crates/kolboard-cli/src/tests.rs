use super::*;

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["kolboard"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn help_is_handled_by_the_parser() {
    let err = Cli::try_parse_from(["kolboard", "--help"]).unwrap_err();
    assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
}

#[test]
fn parses_analyze_with_defaults() {
    let cli = Cli::try_parse_from(["kolboard", "analyze", "--items", "items.json"])
        .expect("expected valid cli args");
    let Some(Commands::Analyze(args)) = cli.command else {
        panic!("expected analyze command");
    };
    assert_eq!(args.items, PathBuf::from("items.json"));
    assert!(args.usernames.is_empty());
    assert_eq!(args.preset, "quick-scan");
    assert_eq!(args.tier_table, None);
    assert_eq!(args.untiered, None);
    assert_eq!(args.platform, Platform::TikTok);
}

#[test]
fn parses_analyze_usernames_and_selectors() {
    let cli = Cli::try_parse_from([
        "kolboard",
        "analyze",
        "--items",
        "items.json",
        "--usernames",
        "jane,@Bob",
        "--preset",
        "profile-analysis",
        "--tier-table",
        "extended",
        "--untiered",
        "exclude",
        "--platform",
        "instagram",
    ])
    .expect("expected valid cli args");
    let Some(Commands::Analyze(args)) = cli.command else {
        panic!("expected analyze command");
    };
    assert_eq!(args.usernames, vec!["jane", "@Bob"]);
    assert_eq!(args.preset, "profile-analysis");
    assert_eq!(args.tier_table, Some(TierTable::Extended));
    assert_eq!(args.untiered, Some(UntieredPolicy::Exclude));
    assert_eq!(args.platform, Platform::Instagram);
}

#[test]
fn rejects_unknown_tier_table() {
    let result = Cli::try_parse_from([
        "kolboard",
        "analyze",
        "--items",
        "items.json",
        "--tier-table",
        "huge",
    ]);
    assert!(result.is_err());
}

#[test]
fn parses_reconcile_with_campaign_and_policy() {
    let cli = Cli::try_parse_from([
        "kolboard",
        "reconcile",
        "--items",
        "items.json",
        "--store",
        "store.json",
        "--campaign",
        "ramadan-2024",
        "--policy",
        "update-metrics",
    ])
    .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Reconcile {
            campaign: Some(ref c),
            policy: Some(MergePolicy::UpdateMetrics),
            ..
        }) if c == "ramadan-2024"
    ));
}

#[test]
fn reconcile_requires_store() {
    let result = Cli::try_parse_from(["kolboard", "reconcile", "--items", "items.json"]);
    assert!(result.is_err());
}

#[test]
fn parses_contacts_with_known_fields() {
    let cli = Cli::try_parse_from([
        "kolboard",
        "contacts",
        "--bio",
        "WA 0812-3456-7890",
        "--email",
        "jane@example.com",
    ])
    .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Contacts { ref email, ref phone, .. })
            if email == "jane@example.com" && phone.is_empty()
    ));
}

#[test]
fn parses_dedupe_store_modes() {
    let cli = Cli::try_parse_from(["kolboard", "dedupe-store", "--store", "store.json"])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::DedupeStore {
            mode: DuplicateMode::PerCampaign,
            ..
        })
    ));

    let cli = Cli::try_parse_from([
        "kolboard",
        "dedupe-store",
        "--store",
        "store.json",
        "--mode",
        "global",
    ])
    .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::DedupeStore {
            mode: DuplicateMode::Global,
            ..
        })
    ));
}

#[test]
fn parses_presets_command() {
    let cli = Cli::try_parse_from(["kolboard", "presets"]).expect("expected valid cli args");
    assert!(matches!(cli.command, Some(Commands::Presets)));
}

#[test]
fn cli_definition_is_consistent() {
    Cli::command().debug_assert();
}
