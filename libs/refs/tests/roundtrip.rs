//! Property tests for reference parsing and formatting.

use proptest::prelude::*;
use strata_refs::{validate_name, RefError, ServiceRef};

proptest! {
    #[test]
    fn valid_names_roundtrip(name in "[a-z0-9]([a-z0-9-]{0,61}[a-z0-9])?") {
        let svc = ServiceRef::new(name.clone()).unwrap();
        let canonical = svc.to_string();
        let parsed: ServiceRef = canonical.parse().unwrap();
        prop_assert_eq!(svc.name(), parsed.name());
        prop_assert_eq!(canonical, format!("svc/{}", name));
    }

    #[test]
    fn arbitrary_input_never_panics(input in ".*") {
        // Parsing must reject or accept, never panic.
        let _ = ServiceRef::parse(&input);
        let _ = validate_name(&input);
    }

    #[test]
    fn hyphen_edges_rejected(core in "[a-z0-9]{0,10}") {
        let leading = format!("-{core}");
        prop_assert!(matches!(
            validate_name(&leading),
            Err(RefError::InvalidName { .. })
        ));
    }
}
