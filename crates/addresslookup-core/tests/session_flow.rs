use addresslookup_core::prelude::*;

fn config() -> WidgetConfig {
    let mut config = WidgetConfig::new("PCW45-TEST");
    config.country_code = Some("UK".into());
    config.fields = FieldMapping::default()
        .with(AddressField::AddressLine1, "#line1")
        .with(AddressField::AddressLine2, "#line2")
        .with(AddressField::PostTown, "#town")
        .with(AddressField::PostCode, "#postcode");
    config
}

fn downing_street_service() -> MemoryService {
    MemoryService::new()
        .with_suggestions(
            "10 Down",
            None,
            vec![
                SuggestionItem::more("GB|RM|A|1", "Downing Street", "London SW1A", 14),
                SuggestionItem::more("GB|RM|A|2", "Down Street", "London W1J", 137),
            ],
        )
        .with_suggestions(
            "10 Down",
            Some("GB|RM|A|1"),
            vec![SuggestionItem::address("GB|RM|A|1|10", "10 Downing Street", "London SW1A 2AA")],
        )
        .with_address(
            "GB|RM|A|1|10",
            AddressRecord {
                organisation: String::new(),
                addressline1: "10 Downing Street".into(),
                posttown: "London".into(),
                postcode: "SW1A 2AA".into(),
                ..AddressRecord::default()
            },
        )
}

fn driver() -> BlockingDriver<MemoryService> {
    let session = AutocompleteSession::new(config()).unwrap();
    BlockingDriver::new(session, downing_street_service())
}

fn field_writes(effects: &[Effect]) -> Vec<(AddressField, String)> {
    effects
        .iter()
        .filter_map(|e| match e {
            Effect::WriteField(w) => Some((w.field, w.value.clone())),
            _ => None,
        })
        .collect()
}

#[test]
fn short_input_never_reaches_the_service() {
    let mut d = driver();
    for text in ["", "1", "10", "  1 0  "] {
        d.search(text);
    }
    assert_eq!(d.service().find_calls(), 0);
    assert!(!d.session().is_open());
    assert!(d.session().suggestions().is_empty());
}

#[test]
fn burst_of_input_produces_one_lookup() {
    let mut d = driver();
    d.input("10 D");
    d.input("10 Do");
    d.input("10 Down");
    d.settle();
    assert_eq!(d.service().find_calls(), 1);
    assert_eq!(d.service().requests()[0].query, "10 Down");
}

#[test]
fn repeated_query_is_served_from_cache() {
    let mut d = driver();
    d.search("10 Down");
    d.search("10  Down ");
    assert_eq!(d.service().find_calls(), 1);
    assert_eq!(d.session().cache().len(), 1);

    // same signature again without new input: hierarchy still grows
    let fx = d.session_mut().fetch_suggestions();
    let fx = d.run(fx);
    assert!(matches!(fx.as_slice(), [Effect::Render { .. }]));
    assert_eq!(d.service().find_calls(), 1);
    assert_eq!(d.session().hierarchy().depth(), 2);
}

#[test]
fn rendered_count_is_capped() {
    let mut d = driver();
    d.search("10 Down");
    let rows = d.session().rows();
    assert_eq!(rows[1].match_count.as_deref(), Some("100+"));
    assert!(rows[1].text().contains("(100+ addresses)"));
    assert!(!rows[1].text().contains("137"));
}

#[test]
fn ten_downing_street_end_to_end() {
    let mut d = driver();
    let fx = d.search("10 Down");
    assert!(fx.iter().any(|e| matches!(e, Effect::Render { rows } if rows.len() == 2)));

    // select the first street
    let (_, prevented) = d.key("ArrowDown");
    assert!(prevented);
    let (fx, _) = d.key("Enter");
    let requests = d.service().requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[1].path_filter.as_deref(), Some("GB|RM|A|1"));
    let Some(Effect::Render { rows }) = fx.last() else {
        panic!("expected a render, got {fx:?}");
    };
    assert_eq!(rows.len(), 2, "back row plus one address");
    assert!(rows[0].is_back());
    assert_eq!(rows[1].match_count, None);

    // the address is the second row, behind the back row
    d.key("ArrowDown");
    d.key("ArrowDown");
    let (fx, _) = d.key("Enter");
    assert_eq!(d.service().retrieve_calls(), 1);
    assert!(fx.contains(&Effect::Hide));
    assert_eq!(
        field_writes(&fx),
        vec![
            (AddressField::AddressLine1, "10 Downing Street".to_string()),
            (AddressField::AddressLine2, String::new()),
            (AddressField::PostTown, "London".to_string()),
            (AddressField::PostCode, "SW1A 2AA".to_string()),
        ]
    );
    assert!(!d.session().is_open());
}

#[test]
fn back_row_restores_root_level_without_network() {
    let mut d = driver();
    d.search("10 Down");
    let root_rows = d.session().rows();

    d.select_row(0);
    assert_eq!(d.session().hierarchy().depth(), 2);

    d.select_row(0);
    assert_eq!(d.service().find_calls(), 2);
    assert_eq!(d.session().rows(), root_rows);
    assert_eq!(d.session().state().cursor, None);
}

#[test]
fn cursor_navigation_is_cyclic() {
    let mut d = driver();
    d.search("10 Down");
    d.key("ArrowUp");
    assert_eq!(d.session().state().cursor, Some(1));
    d.key("ArrowDown");
    assert_eq!(d.session().state().cursor, Some(0));
    d.key("Up");
    assert_eq!(d.session().state().cursor, Some(1));
}

#[test]
fn transport_failure_is_reported_and_recoverable() {
    let service = downing_street_service().with_failure("10 Downx");
    let mut d = BlockingDriver::new(AutocompleteSession::new(config()).unwrap(), service);
    d.search("10 Down");
    let fx = d.search("10 Downx");
    assert!(fx
        .iter()
        .any(|e| matches!(e, Effect::Report(diag) if diag.kind == ErrorKind::Transport)));
    assert!(d.session().is_open());
    assert_eq!(d.session().suggestions().len(), 2);

    d.search("10 Down");
    assert!(d.session().is_open());
    assert_eq!(d.session().cache().len(), 1);
}

#[test]
fn geolocation_prefills_country() {
    let mut config = config();
    config.country_code = None;
    config.geolocate = true;
    let service = downing_street_service().with_country("UK");
    let mut d = BlockingDriver::new(AutocompleteSession::new(config).unwrap(), service);
    let fx = d.start();
    assert_eq!(fx, vec![Effect::SetCountry { code: "UK".into() }]);
    d.search("10 Down");
    assert_eq!(d.service().requests()[0].country, "UK");
}

#[test]
fn failed_geolocation_is_not_fatal() {
    let mut config = config();
    config.country_code = None;
    config.geolocate = true;
    let mut d = BlockingDriver::new(AutocompleteSession::new(config).unwrap(), downing_street_service());
    let fx = d.start();
    assert!(matches!(fx.as_slice(), [Effect::Report(_)]));
    d.country_changed("uk");
    d.search("10 Down");
    assert_eq!(d.service().requests()[0].country, "UK");
    assert!(d.session().is_open());
}

#[test]
fn escape_restores_query_and_outside_click_does_not() {
    let mut d = driver();
    d.search("10 Down");
    let (fx, prevented) = d.key("Escape");
    assert!(!prevented);
    assert_eq!(fx, vec![Effect::Hide, Effect::SetInputText { text: "10 Down".into() }]);

    d.focus();
    assert!(d.session().is_open());
    let fx = d.outside_click();
    assert_eq!(fx, vec![Effect::Hide]);
}

#[test]
fn superseded_lookup_failure_is_ignored() {
    let mut s = AutocompleteSession::new(config()).unwrap();
    s.input_changed("10 Dow", 0);
    let Some(Effect::Lookup { ticket: stale, .. }) = s.timer_fired(300).pop() else {
        panic!("expected a lookup");
    };

    let fx = s.input_changed("10 Down", 500);
    assert!(fx.contains(&Effect::CancelLookup { ticket: stale }));
    let fx = s.timer_fired(800);
    let Some(Effect::Lookup { ticket: current, .. }) = fx.last().cloned() else {
        panic!("expected a lookup, got {fx:?}");
    };

    let late = s.suggestions_resolved(
        stale,
        Err(AutocompleteError::transport(Some(500), "Internal Server Error")),
    );
    assert!(late.is_empty());
    assert_eq!(s.state().pending.as_ref().map(|p| p.ticket), Some(current));

    s.suggestions_resolved(
        current,
        Ok(vec![SuggestionItem::more("GB|RM|A|1", "Downing Street", "London SW1A", 14)]),
    );
    assert!(s.is_open());
    assert_eq!(s.suggestions().len(), 1);
}
