use std::collections::HashMap;

use qilang_core::lang::keywords;
use qilang_core::lang::operators::{self, Fixity};
use qilang_core::lang::types;

#[test]
fn keywords_spellings_unique_and_resolvable() {
    let mut seen: HashMap<&'static str, keywords::KeywordId> = HashMap::new();

    for info in keywords::KEYWORDS {
        assert_eq!(
            keywords::from_str(info.canonical),
            Some(info.id),
            "keyword canonical spelling not resolvable: {}",
            info.canonical
        );
        assert_eq!(keywords::as_str(info.id), info.canonical);

        if let Some(prev) = seen.insert(info.canonical, info.id) {
            panic!(
                "duplicate keyword spelling {:?}: {:?} and {:?}",
                info.canonical, prev, info.id
            );
        }

        for &alias in info.aliases {
            assert_eq!(keywords::from_str(alias), Some(info.id), "keyword alias not resolvable: {}", alias);
            if let Some(prev) = seen.insert(alias, info.id) {
                panic!("duplicate keyword alias spelling {:?}: {:?} and {:?}", alias, prev, info.id);
            }
        }
    }
}

#[test]
fn builtin_types_spellings_unique_and_resolvable() {
    let mut seen: HashMap<&'static str, types::BuiltinTypeId> = HashMap::new();

    for info in types::BUILTIN_TYPES {
        assert_eq!(types::from_str(info.canonical), Some(info.id));
        assert_eq!(types::as_str(info.id), info.canonical);
        assert!(
            keywords::from_str(info.canonical).is_none(),
            "builtin type {:?} collides with a keyword",
            info.canonical
        );
        if let Some(prev) = seen.insert(info.canonical, info.id) {
            panic!("duplicate builtin spelling {:?}: {:?} and {:?}", info.canonical, prev, info.id);
        }
        for &alias in info.aliases {
            assert_eq!(types::from_str(alias), Some(info.id));
            assert!(seen.insert(alias, info.id).is_none(), "duplicate alias {alias:?}");
        }
    }
}

#[test]
fn operators_spellings_unique_and_positioned() {
    let mut seen: HashMap<&'static str, operators::OperatorId> = HashMap::new();

    for info in operators::OPERATORS {
        assert_eq!(operators::from_str(info.spelling), Some(info.id));
        assert!(!info.fixity.is_empty(), "operator {:?} has no fixity", info.id);
        if let Some(prev) = seen.insert(info.spelling, info.id) {
            panic!("duplicate operator spelling {:?}: {:?} and {:?}", info.spelling, prev, info.id);
        }
    }

    assert!(operators::allows(operators::OperatorId::Minus, Fixity::Prefix));
    assert!(operators::allows(operators::OperatorId::Minus, Fixity::Infix));
    assert!(!operators::allows(operators::OperatorId::Plus, Fixity::Prefix));
}
