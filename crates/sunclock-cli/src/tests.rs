use super::*;

#[test]
fn parses_request_command() {
    let cli = Cli::try_parse_from(["sunclock", "request", "--lat", "47.6062", "--lon", "-122.3321"])
        .expect("expected valid cli args");

    assert!(matches!(cli.command, Some(Commands::Request)));
    assert_eq!(cli.lat, Some(47.6062));
    assert_eq!(cli.lon, Some(-122.3321));
    assert!(!cli.basic);
}

#[test]
fn parses_closed_response() {
    let cli = Cli::try_parse_from(["sunclock", "closed", "CANCELLED"]).expect("expected valid cli args");

    match cli.command {
        Some(Commands::Closed { response }) => assert_eq!(response, "CANCELLED"),
        other => panic!("expected Closed, got {other:?}"),
    }
}

#[test]
fn global_flags_follow_subcommand() {
    let cli = Cli::try_parse_from(["sunclock", "geocode", "--lat", "51.5", "--lon", "-0.12", "--basic"])
        .expect("expected valid cli args");

    assert!(matches!(cli.command, Some(Commands::Geocode)));
    assert_eq!(cli.lat.zip(cli.lon), Some((51.5, -0.12)));
    assert!(cli.basic);
}

#[test]
fn closed_requires_a_response() {
    assert!(Cli::try_parse_from(["sunclock", "closed"]).is_err());
}

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["sunclock"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn request_payload_asks_for_coordinates() {
    let request = sunclock_core::DeviceRequest::from_payload(&request_payload());
    assert!(request.wants_coordinates);
    assert_eq!(request.timeout_hint, None);
}

#[test]
fn console_offset_is_positive_west_of_greenwich() {
    assert_eq!(console::utc_offset_from_local(-7 * 3600), 25_200);
    assert_eq!(console::utc_offset_from_local(3600), -3600);
}

#[test]
fn hex_renders_dictionary_bytes() {
    assert_eq!(console::hex(&[0x01, 0xab, 0x00]), "01ab00");
    assert_eq!(console::hex(&[]), "");
}

#[test]
fn replay_skips_blank_and_comment_lines() {
    assert!(replay::parse_line("").unwrap().is_none());
    assert!(replay::parse_line("  # send coords twice").unwrap().is_none());
    assert_eq!(
        replay::parse_line(r#"{"event": "ready"}"#).unwrap(),
        Some(HostEvent::Ready)
    );
    assert!(replay::parse_line(r#"{"event": "unknown"}"#).is_err());
}

#[tokio::test]
async fn replay_runs_session_with_cancelled_fallback() {
    let host = Arc::new(ConsoleHost::new());
    let provider = Arc::new(FixedProvider::new(Some((47.6062, -122.3321))));
    let urls = sunclock_core::ConfigUrls::from_base("http://config.test/").unwrap();
    let relay = Relay::builder(host, provider, urls).build();

    let script = concat!(
        "{\"event\": \"ready\"}\n",
        "{\"event\": \"webview-closed\", \"response\": \"send-coords\"}\n",
        "{\"event\": \"webview-closed\", \"response\": \"CANCELLED\"}\n",
    );
    replay::run_replay(&relay, script.as_bytes()).await.unwrap();

    assert_eq!(
        relay.session().last_real_response(),
        Some(sunclock_core::ScreenResponse::SendCoords)
    );
}

fn config_with(flares_url: &str, geonames_base_url: &str) -> AppConfig {
    AppConfig {
        env: Environment::Test,
        log_level: "info".to_string(),
        variant: RelayVariant::Full,
        urls: sunclock_core::ConfigUrls::from_base("http://config.test/").unwrap(),
        geonames_base_url: geonames_base_url.to_string(),
        geonames_username: "demo".to_string(),
        flares_url: flares_url.to_string(),
        user_agent: "sunclock-test/0.1".to_string(),
        timings: sunclock_core::GuardTimings::default(),
    }
}

#[test]
fn only_production_uses_plain_logs() {
    assert!(plain_logs(&Environment::Production));
    assert!(!plain_logs(&Environment::Development));
    assert!(!plain_logs(&Environment::Test));
}

#[test]
fn flare_client_error_keeps_its_source() {
    let err = lookup::flare_client(&config_with("not a url", "http://geonames.test/"))
        .err()
        .expect("relative flare URL should be rejected");

    assert_eq!(err.to_string(), "failed to build flare client");
    assert_eq!(err.chain().count(), 2);
    assert!(matches!(
        err.downcast_ref::<sunclock_flares::FlareError>(),
        Some(sunclock_flares::FlareError::InvalidUrl { .. })
    ));
}

#[test]
fn geonames_client_error_keeps_its_source() {
    let err = lookup::geonames_client(&config_with("http://flares.test/", "not a url"))
        .err()
        .expect("relative geonames URL should be rejected");

    assert_eq!(err.to_string(), "failed to build geonames client");
    assert!(matches!(
        err.downcast_ref::<sunclock_geonames::GeonamesError>(),
        Some(sunclock_geonames::GeonamesError::InvalidBaseUrl { .. })
    ));
}

#[test]
fn configured_clients_build() {
    let config = config_with("http://flares.test/iridium.html", "http://geonames.test/");
    assert!(lookup::flare_client(&config).is_ok());
    assert!(lookup::geonames_client(&config).is_ok());
}
