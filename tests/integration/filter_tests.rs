//! Filter construction through the public API.

use proptest::prelude::*;
use uaa::filter::{Combinator, FilterRequestBuilder, Operation};
use uaa::{ErrorKind, FilterRequest};
use url::Url;

#[test]
fn test_builder_matches_hand_built_tree() {
    let request = FilterRequestBuilder::new()
        .equals("origin", "ldap")
        .unwrap()
        .starts_with("userName", "adm")
        .unwrap()
        .present("emails")
        .unwrap()
        .or()
        .unwrap()
        .precedence()
        .unwrap()
        .build()
        .unwrap();

    let expected = Operation::and(
        Operation::equals("origin", "ldap"),
        Operation::or(Operation::starts_with("userName", "adm"), Operation::present("emails")).precedence(),
    );

    assert_eq!(request.filter(), Some(expected.to_string().as_str()));
    assert_eq!(request.filter(), Some(r#"origin eq "ldap" and (userName sw "adm" or emails pr)"#));
}

#[test]
fn test_default_or_combinator() {
    let request = FilterRequestBuilder::with_default_combinator(Combinator::Or)
        .equals("id", "a")
        .unwrap()
        .equals("id", "b")
        .unwrap()
        .equals("id", "c")
        .unwrap()
        .build()
        .unwrap();

    assert_eq!(request.filter(), Some(r#"id eq "a" or id eq "b" or id eq "c""#));
}

#[test]
fn test_builder_misuse_is_reported() {
    let mut builder = FilterRequestBuilder::new();
    builder.equals("id", "a").unwrap();

    let err = builder.and().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InsufficientOperands);

    builder.build().unwrap();
    let err = builder.present("emails").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BuilderReuse);

    let err = FilterRequestBuilder::new().precedence().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EmptyStack);
}

#[test]
fn test_request_query_encoding() {
    let request = FilterRequestBuilder::new()
        .equals("userName", "jo&ann")
        .unwrap()
        .attributes(["id", "userName"])
        .unwrap()
        .count(25)
        .unwrap()
        .build()
        .unwrap();

    let mut url = Url::parse("https://uaa.example.com/Users").unwrap();
    request.apply_to(&mut url);

    let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
    assert_eq!(
        pairs,
        vec![
            ("attributes".to_string(), "id,userName".to_string()),
            ("filter".to_string(), r#"userName eq "jo&ann""#.to_string()),
            ("count".to_string(), "25".to_string()),
        ]
    );
}

#[test]
fn test_show_all_leaves_url_untouched() {
    let mut url = Url::parse("https://uaa.example.com/Users").unwrap();
    FilterRequest::show_all().apply_to(&mut url);
    assert_eq!(url.query(), None);
}

proptest! {
    #[test]
    fn prop_equals_value_is_quoted_verbatim(value in "[a-zA-Z0-9 ._@-]{0,24}") {
        let request = FilterRequestBuilder::new().equals("userName", value.as_str()).unwrap().build().unwrap();
        prop_assert_eq!(request.filter().map(str::to_string), Some(format!("userName eq \"{}\"", value)));
    }
}
