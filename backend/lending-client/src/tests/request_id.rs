use crate::api_client::generate_request_id;

use std::collections::HashSet;

#[test]
fn given_request_id_when_generated_then_millis_dash_nine_alphanumerics() {
    let id = generate_request_id();

    let (millis, suffix) = id.split_once('-').expect("dash separator");
    assert!(millis.parse::<u128>().is_ok(), "{id}");
    assert_eq!(suffix.len(), 9, "{id}");
    assert!(
        suffix
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()),
        "{id}"
    );
}

#[test]
fn given_many_ids_in_same_millisecond_when_generated_then_no_collisions() {
    let ids: HashSet<String> = (0..1000).map(|_| generate_request_id()).collect();

    assert_eq!(ids.len(), 1000);
}
