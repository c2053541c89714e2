// Tests for table storage, raw access and traversal
use super::{call_global, list, record};
use crate::lua_vm::{SafeOption, rawget, rawlen, rawset};
use crate::stdlib::Stdlib;
use crate::{LuaTable, LuaVM, LuaValue};

#[test]
fn test_rawget_unassigned_is_nil() {
    let t = LuaValue::table(LuaTable::make(Vec::new(), None).unwrap());
    for key in [
        LuaValue::from("missing"),
        LuaValue::number(1.0),
        LuaValue::number(-3.5),
        LuaValue::boolean(true),
        t.clone(),
    ] {
        assert!(rawget(&t, &key).unwrap().is_nil());
    }
}

#[test]
fn test_rawset_rawget_round_trip() {
    let t = LuaValue::table(LuaTable::make(Vec::new(), None).unwrap());
    let other = list(vec![]);
    let foreign = LuaValue::foreign(String::from("host"));
    let keys = [
        LuaValue::from("name"),
        LuaValue::from("__proto__"),
        LuaValue::from(""),
        LuaValue::number(1.0),
        LuaValue::number(0.0),
        LuaValue::number(-7.0),
        LuaValue::number(2.5),
        LuaValue::number(1e300),
        LuaValue::boolean(false),
        other.clone(),
        foreign.clone(),
    ];
    for (i, key) in keys.iter().enumerate() {
        rawset(&t, key.clone(), LuaValue::number(i as f64)).unwrap();
    }
    for (i, key) in keys.iter().enumerate() {
        assert_eq!(rawget(&t, key).unwrap(), LuaValue::number(i as f64), "key {:?}", key);
    }

    // identity, not structure, for reference keys
    assert!(rawget(&t, &list(vec![])).unwrap().is_nil());
    assert!(rawget(&t, &LuaValue::foreign(String::from("host"))).unwrap().is_nil());
}

#[test]
fn test_integer_valued_floats_share_a_key() {
    let t = list(vec![]);
    rawset(&t, LuaValue::number(2.0), LuaValue::from("two")).unwrap();
    rawset(&t, LuaValue::number(-0.0), LuaValue::from("zero")).unwrap();
    assert_eq!(rawget(&t, &LuaValue::from(2)).unwrap(), LuaValue::from("two"));
    assert_eq!(rawget(&t, &LuaValue::number(0.0)).unwrap(), LuaValue::from("zero"));
}

#[test]
fn test_nil_and_nan_keys_rejected() {
    let t = list(vec![]);
    let err = rawset(&t, LuaValue::nil(), LuaValue::number(1.0)).unwrap_err();
    assert_eq!(err.message(), "table index is nil");
    let err = rawset(&t, LuaValue::number(f64::NAN), LuaValue::number(1.0)).unwrap_err();
    assert_eq!(err.message(), "table index is NaN");
}

#[test]
fn test_raw_access_on_non_tables() {
    let err = rawget(&LuaValue::from("s"), &LuaValue::number(1.0)).unwrap_err();
    assert_eq!(err.message(), "attempt to rawget a string value");
    let err = rawset(&LuaValue::nil(), LuaValue::number(1.0), LuaValue::nil()).unwrap_err();
    assert_eq!(err.message(), "attempt to rawset a nil value");
}

#[test]
fn test_border_after_clearing() {
    let vm = LuaVM::new(SafeOption::default());
    let t = list(vec![1.0.into(), 2.0.into(), 3.0.into()]);
    assert_eq!(vm.len(&t).unwrap(), LuaValue::number(3.0));

    rawset(&t, LuaValue::number(2.0), LuaValue::nil()).unwrap();
    assert_eq!(vm.len(&t).unwrap(), LuaValue::number(1.0));
    assert_eq!(rawget(&t, &LuaValue::number(3.0)).unwrap(), LuaValue::number(3.0));
    assert_eq!(rawlen(&t).unwrap(), 1);
}

#[test]
fn test_out_of_order_fill_joins_dense_part() {
    let vm = LuaVM::new(SafeOption::default());
    let t = list(vec![]);
    for key in [3.0, 2.0, 5.0] {
        rawset(&t, LuaValue::number(key), LuaValue::number(key * 10.0)).unwrap();
    }
    assert_eq!(vm.len(&t).unwrap(), LuaValue::number(0.0));

    rawset(&t, LuaValue::number(1.0), LuaValue::number(10.0)).unwrap();
    assert_eq!(vm.len(&t).unwrap(), LuaValue::number(3.0));

    rawset(&t, LuaValue::number(4.0), LuaValue::number(40.0)).unwrap();
    assert_eq!(vm.len(&t).unwrap(), LuaValue::number(5.0));
    for key in 1..=5 {
        assert_eq!(
            rawget(&t, &LuaValue::from(key)).unwrap(),
            LuaValue::from(key * 10)
        );
    }
}

#[test]
fn test_make_with_rest_values() {
    let entries = vec![
        (LuaValue::from("n"), LuaValue::number(2.0)),
        (LuaValue::number(1.0), LuaValue::from("first")),
    ];
    let rest = vec![LuaValue::from("a"), LuaValue::from("b")];
    let t = LuaValue::table(LuaTable::make(entries, Some((2.0, rest))).unwrap());

    assert_eq!(rawget(&t, &LuaValue::number(1.0)).unwrap(), LuaValue::from("first"));
    assert_eq!(rawget(&t, &LuaValue::number(2.0)).unwrap(), LuaValue::from("a"));
    assert_eq!(rawget(&t, &LuaValue::number(3.0)).unwrap(), LuaValue::from("b"));
    assert_eq!(rawlen(&t).unwrap(), 3);
}

#[test]
fn test_make_rejects_nil_key() {
    let entries = vec![(LuaValue::nil(), LuaValue::number(1.0))];
    let err = LuaTable::make(entries, None).unwrap_err();
    assert_eq!(err.message(), "table index is nil");
}

/// Drive `pairs` the way a translated generic `for` does
fn collect_pairs(vm: &LuaVM, t: &LuaValue) -> Vec<(LuaValue, LuaValue)> {
    let triple = call_global(vm, "pairs", &[t.clone()]).unwrap();
    let next = triple[0].clone();
    let mut out = Vec::new();
    loop {
        let step = vm.call(&next, &[triple[1].clone(), triple[2].clone()]).unwrap().into_vec();
        if step.is_empty() {
            break;
        }
        out.push((step[0].clone(), step[1].clone()));
    }
    out
}

#[test]
fn test_pairs_segment_order() {
    let mut vm = LuaVM::new(SafeOption::default());
    vm.open_stdlib(Stdlib::All).unwrap();

    let t = list(vec!["x".into(), "y".into()]);
    rawset(&t, LuaValue::from("name"), LuaValue::from("n")).unwrap();
    rawset(&t, LuaValue::boolean(true), LuaValue::from("yes")).unwrap();
    rawset(&t, LuaValue::number(10.0), LuaValue::from("ten")).unwrap();
    rawset(&t, LuaValue::from("kind"), LuaValue::from("k")).unwrap();

    let pairs = collect_pairs(&vm, &t);
    let keys: Vec<LuaValue> = pairs.iter().map(|(k, _)| k.clone()).collect();
    assert_eq!(
        keys,
        vec![
            LuaValue::number(1.0),
            LuaValue::number(2.0),
            LuaValue::from("name"),
            LuaValue::from("kind"),
            LuaValue::boolean(true),
            LuaValue::number(10.0),
        ]
    );
    assert_eq!(pairs[4].1, LuaValue::from("yes"));
}

#[test]
fn test_pairs_skips_holes_and_cleared_keys() {
    let mut vm = LuaVM::new(SafeOption::default());
    vm.open_stdlib(Stdlib::All).unwrap();

    let t = list(vec![1.0.into(), 2.0.into(), 3.0.into()]);
    rawset(&t, LuaValue::number(2.0), LuaValue::nil()).unwrap();
    rawset(&t, LuaValue::from("gone"), LuaValue::boolean(true)).unwrap();
    rawset(&t, LuaValue::from("gone"), LuaValue::nil()).unwrap();

    let keys: Vec<LuaValue> = collect_pairs(&vm, &t).into_iter().map(|(k, _)| k).collect();
    assert_eq!(keys, vec![LuaValue::number(1.0), LuaValue::number(3.0)]);
}

#[test]
fn test_pairs_allows_clearing_during_traversal() {
    let mut vm = LuaVM::new(SafeOption::default());
    vm.open_stdlib(Stdlib::All).unwrap();

    let t = record(vec![
        ("a", LuaValue::number(1.0)),
        ("b", LuaValue::number(2.0)),
        ("c", LuaValue::number(3.0)),
    ]);
    let triple = call_global(&vm, "pairs", &[t.clone()]).unwrap();
    let mut seen = 0;
    loop {
        let step = vm.call(&triple[0], &[]).unwrap().into_vec();
        if step.is_empty() {
            break;
        }
        rawset(&t, step[0].clone(), LuaValue::nil()).unwrap();
        seen += 1;
    }
    assert_eq!(seen, 3);
    assert!(collect_pairs(&vm, &t).is_empty());
}

#[test]
fn test_pairs_cursors_are_independent() {
    let mut vm = LuaVM::new(SafeOption::default());
    vm.open_stdlib(Stdlib::All).unwrap();

    let t = list(vec!["a".into(), "b".into()]);
    let first = call_global(&vm, "pairs", &[t.clone()]).unwrap();
    let second = call_global(&vm, "pairs", &[t.clone()]).unwrap();
    vm.call(&first[0], &[]).unwrap();
    let step = vm.call(&second[0], &[]).unwrap().into_vec();
    assert_eq!(step, vec![LuaValue::number(1.0), LuaValue::from("a")]);
}

#[test]
fn test_pairs_requires_table() {
    let mut vm = LuaVM::new(SafeOption::default());
    vm.open_stdlib(Stdlib::All).unwrap();

    let err = call_global(&vm, "pairs", &[LuaValue::number(1.0)]).unwrap_err();
    assert_eq!(err.message(), "bad argument #1 to 'pairs' (table expected, got number)");
}

#[test]
fn test_ipairs_stops_at_first_nil() {
    let mut vm = LuaVM::new(SafeOption::default());
    vm.open_stdlib(Stdlib::All).unwrap();

    let t = list(vec![LuaValue::from("a"), LuaValue::boolean(false), LuaValue::nil(), LuaValue::from("d")]);
    let triple = call_global(&vm, "ipairs", &[t.clone()]).unwrap();
    assert_eq!(triple[2], LuaValue::number(0.0));

    let mut control = triple[2].clone();
    let mut values = Vec::new();
    loop {
        let step = vm.call(&triple[0], &[t.clone(), control]).unwrap().into_vec();
        if step.is_empty() {
            break;
        }
        control = step[0].clone();
        values.push(step[1].clone());
    }
    assert_eq!(values, vec![LuaValue::from("a"), LuaValue::boolean(false)]);
}

#[test]
fn test_unpack_stops_at_nil_only() {
    let mut vm = LuaVM::new(SafeOption::default());
    vm.open_stdlib(Stdlib::All).unwrap();

    let t = list(vec![LuaValue::boolean(false), LuaValue::number(0.0), LuaValue::nil()]);
    let values = call_global(&vm, "unpack", &[t]).unwrap();
    assert_eq!(values, vec![LuaValue::boolean(false), LuaValue::number(0.0)]);
}

#[test]
fn test_pack_unpack_round_trip() {
    let mut vm = LuaVM::new(SafeOption::default());
    vm.open_stdlib(Stdlib::All).unwrap();

    let values = vec![LuaValue::from("x"), LuaValue::number(2.0), LuaValue::boolean(true)];
    let packed = call_global(&vm, "pack", &values).unwrap();
    assert_eq!(packed.len(), 1);
    assert_eq!(rawlen(&packed[0]).unwrap(), 3);
    assert_eq!(call_global(&vm, "unpack", &packed).unwrap(), values);

    let empty = call_global(&vm, "pack", &[]).unwrap();
    assert!(call_global(&vm, "unpack", &empty).unwrap().is_empty());
}

#[test]
fn test_rawlen_of_string_and_table() {
    let mut vm = LuaVM::new(SafeOption::default());
    vm.open_stdlib(Stdlib::All).unwrap();

    let len = call_global(&vm, "rawlen", &[LuaValue::from("héllo")]).unwrap();
    assert_eq!(len, vec![LuaValue::number(6.0)]);
    let err = call_global(&vm, "rawlen", &[LuaValue::boolean(true)]).unwrap_err();
    assert_eq!(err.message(), "table or string expected, got boolean");
}
