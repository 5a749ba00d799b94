use loc_tally::config::Config;

#[test]
fn parse_example_config() {
    let raw = include_str!("../loc-tally.example.toml");
    let cfg: Config = toml::from_str(raw).expect("parse TOML");
    assert_eq!(cfg.rates.word, 5.0);
    assert_eq!(cfg.rates.ppt, 7.0);
    assert_eq!(cfg.rates.pdf, 15.0);
    assert_eq!(cfg.scan.exclude_patterns, vec![r"^~\$".to_string()]);
    assert!(cfg.output.write_log);
    assert_eq!(cfg.logging.level, "info");
}

#[test]
fn partial_rates_section_keeps_defaults() {
    let cfg: Config = toml::from_str("[rates]\nword = 6.0\n").expect("parse TOML");
    assert_eq!(cfg.rates.word, 6.0);
    assert_eq!(cfg.rates.ppt, 7.0);
    assert_eq!(cfg.rates.pdf, 15.0);
}

#[test]
fn empty_config_is_all_defaults() {
    let cfg: Config = toml::from_str("").expect("parse TOML");
    assert_eq!(cfg.rates.word, 5.0);
    assert!(!cfg.scan.recursive);
    assert!(cfg.output.print_report);
    assert!(!cfg.logging.write_to_file);
}
