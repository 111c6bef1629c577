use damask_fs::NormalizedPath;
use proptest::prelude::*;

proptest! {
    #[test]
    fn test_normalization_invariants(s in "\\PC*") {
        let path = NormalizedPath::new(&s);
        let as_str = path.as_str();

        prop_assert!(!as_str.contains('\\'));

        // A leading "//" is a network prefix; no other doubled separator survives.
        let remainder = if as_str.starts_with("//") { &as_str[2..] } else { as_str };
        prop_assert!(!remainder.contains("//"));

        if as_str != "." {
            prop_assert!(!as_str.split('/').any(|part| part == "."), "dot component in {}", as_str);
        }
    }

    #[test]
    fn test_normalization_is_idempotent(s in "[a-z./\\\\]{0,24}") {
        let once = NormalizedPath::new(&s);
        let twice = NormalizedPath::new(once.as_str());
        prop_assert_eq!(&once, &twice);

        let roundtripped = NormalizedPath::new(once.to_native());
        prop_assert_eq!(once, roundtripped);
    }

    #[test]
    fn test_join_stays_under_absolute_base(a in "[a-z]{1,8}(/[a-z]{1,8}){0,3}", b in "[a-z]{1,8}(/[a-z]{1,8}){0,3}") {
        let base = NormalizedPath::new(format!("/{a}"));
        let joined = base.join(&b);
        let prefix = format!("{}/", base.as_str());
        prop_assert!(joined.as_str().starts_with(&prefix));
        prop_assert_eq!(joined.as_str(), format!("/{a}/{b}"));
    }
}
