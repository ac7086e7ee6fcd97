use proptest::prelude::*;
use sumvar::Variant;

type Value = Variant![i64, #[backup] String, Vec<u8>];

/// Reference behaviour: a plain enum.
#[derive(Debug, Clone, PartialEq)]
enum Model {
    Int(i64),
    Text(String),
    Bytes(Vec<u8>),
}

#[derive(Debug, Clone)]
enum Operation {
    SetInt(i64),
    SetText(String),
    SetBytes(Vec<u8>),
    FailText,
    Swap,
    CopyFromSpare,
    Take,
}

fn agrees(value: &Value, model: &Model) -> bool {
    match model {
        Model::Int(n) => value.which() == 0 && value.get::<i64, _>() == Some(n),
        Model::Text(s) => value.which() == 1 && value.get::<String, _>() == Some(s),
        Model::Bytes(b) => value.which() == 2 && value.get::<Vec<u8>, _>() == Some(b),
    }
}

fn taken(model: &mut Model) -> Model {
    let replacement = match model {
        Model::Int(_) => Model::Int(0),
        Model::Text(_) => Model::Text(String::new()),
        Model::Bytes(_) => Model::Bytes(Vec::new()),
    };
    std::mem::replace(model, replacement)
}

fn operation() -> impl Strategy<Value = Operation> {
    prop_oneof![
        any::<i64>().prop_map(Operation::SetInt),
        ".{0,12}".prop_map(Operation::SetText),
        proptest::collection::vec(any::<u8>(), 0..8).prop_map(Operation::SetBytes),
        Just(Operation::FailText),
        Just(Operation::Swap),
        Just(Operation::CopyFromSpare),
        Just(Operation::Take),
    ]
}

proptest! {
    #[test]
    fn test_variant_matches_enum_model(ops in proptest::collection::vec(operation(), 1..64)) {
        let mut value = Value::new(0i64);
        let mut model = Model::Int(0);
        let mut spare = Value::new(String::from("spare"));
        let mut spare_model = Model::Text(String::from("spare"));

        for op in ops {
            match op {
                Operation::SetInt(n) => {
                    value.set(n);
                    model = Model::Int(n);
                }
                Operation::SetText(s) => {
                    value.assign(&s);
                    model = Model::Text(s);
                }
                Operation::SetBytes(b) => {
                    value.set(b.clone());
                    model = Model::Bytes(b);
                }
                Operation::FailText => {
                    let result = value.try_assign_with::<String, _, _, _>(|| Err(()));
                    prop_assert!(result.is_err());
                }
                Operation::Swap => {
                    value.swap(&mut spare);
                    std::mem::swap(&mut model, &mut spare_model);
                }
                Operation::CopyFromSpare => {
                    value.clone_from(&spare);
                    model = spare_model.clone();
                }
                Operation::Take => {
                    let moved = value.take();
                    let moved_model = taken(&mut model);
                    prop_assert!(agrees(&moved, &moved_model), "moved {:?} vs {:?}", moved, moved_model);
                }
            }
            prop_assert!(agrees(&value, &model), "value {:?} vs model {:?}", value, model);
            prop_assert!(agrees(&spare, &spare_model), "spare {:?} vs model {:?}", spare, spare_model);
        }
    }

    #[test]
    fn test_order_is_index_then_value(a in any::<i64>(), b in any::<i64>(), s in ".{0,6}") {
        let left = Value::new(a);
        let right = Value::new(b);
        prop_assert_eq!(left.cmp(&right), a.cmp(&b));
        prop_assert!(Value::new(a) < Value::new(s));
    }

    #[test]
    fn test_clone_equals_source(n in any::<i64>(), text in ".{0,12}", pick in 0usize..3) {
        let source = match pick {
            0 => Value::new(n),
            1 => Value::new(text),
            _ => Value::new(n.to_le_bytes().to_vec()),
        };
        let copy = source.clone();
        prop_assert_eq!(&copy, &source);
        prop_assert_eq!(copy.which(), pick);
    }
}

#[cfg(feature = "proptest")]
proptest! {
    #[test]
    fn test_strategy_produces_valid_variants(values in proptest::collection::vec(
        sumvar::strategy::any_variant::<sumvar::alternatives![i64, #[backup] String, Vec<u8>]>(),
        64,
    )) {
        prop_assert!(values.iter().all(|v| v.which() < 3));
        for v in &values {
            prop_assert_eq!(v, &v.clone());
        }
    }
}
