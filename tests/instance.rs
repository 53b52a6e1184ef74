use anyhow::Result;
use wasmbind::*;

/// A module declaring one export of each kind, in a fixed order.
const ALL_KINDS_WAT: &str = r#"
(module
  (func (export "func") (param i32 i64))
  (global (export "glob") i32 (i32.const 7))
  (table (export "tab") 0 funcref)
  (memory (export "mem") 1))
"#;

#[test]
fn instantiation_produces_all_export_kinds() -> Result<()> {
    let mut store = Store::default();
    let module = Module::new(&store, ALL_KINDS_WAT)?;
    let instance = Instance::new(&mut store, &module, &imports! {})?;
    let exports = &instance.exports;

    assert_eq!(exports.len(), 4);
    assert!(!exports.is_empty());

    assert!(exports.get_function("func").is_ok());
    assert!(exports.get_global("glob").is_ok());
    assert!(exports.get_table("tab").is_ok());
    assert!(exports.get_memory("mem").is_ok());

    let glob = exports.get_global("glob")?;
    assert_eq!(glob.get(&store).i32(), Some(7));

    Ok(())
}

#[test]
fn exports_preserve_declaration_order() -> Result<()> {
    let mut store = Store::default();
    let module = Module::new(&store, ALL_KINDS_WAT)?;
    let instance = Instance::new(&mut store, &module, &imports! {})?;

    let names: Vec<&String> = instance.exports.iter().map(|(name, _)| name).collect();
    assert_eq!(names, ["func", "glob", "tab", "mem"]);

    // Two independently obtained iterators observe the same sequence.
    let names_again: Vec<&String> = instance.exports.iter().map(|(name, _)| name).collect();
    assert_eq!(names, names_again);

    Ok(())
}

#[test]
fn exports_iterator_yields_pairs_and_fuses() -> Result<()> {
    let mut store = Store::default();
    let module = Module::new(&store, ALL_KINDS_WAT)?;
    let instance = Instance::new(&mut store, &module, &imports! {})?;

    let mut iter = instance.exports.iter();
    assert_eq!(iter.len(), 4);

    let (name, export) = iter.next().unwrap();
    assert_eq!(name, "func");
    assert!(matches!(export, Extern::Function(_)));

    let (name, export) = iter.next().unwrap();
    assert_eq!(name, "glob");
    assert!(matches!(export, Extern::Global(_)));

    let (name, export) = iter.next().unwrap();
    assert_eq!(name, "tab");
    assert!(matches!(export, Extern::Table(_)));

    let (name, export) = iter.next().unwrap();
    assert_eq!(name, "mem");
    assert!(matches!(export, Extern::Memory(_)));

    // Exhausted: keeps signaling end-of-sequence, never wraps around.
    assert!(iter.next().is_none());
    assert!(iter.next().is_none());
    assert!(iter.next().is_none());

    // Works in a loop too, with an identical sequence.
    let mut count = 0;
    for (_name, _export) in instance.exports.iter() {
        count += 1;
    }
    assert_eq!(count, 4);

    Ok(())
}

#[test]
fn independent_iterators_have_independent_cursors() -> Result<()> {
    let mut store = Store::default();
    let module = Module::new(&store, ALL_KINDS_WAT)?;
    let instance = Instance::new(&mut store, &module, &imports! {})?;

    let mut first = instance.exports.iter();
    let mut second = instance.exports.iter();

    assert_eq!(first.next().unwrap().0, "func");
    assert_eq!(first.next().unwrap().0, "glob");

    // Advancing `first` did not move `second`.
    assert_eq!(second.next().unwrap().0, "func");

    Ok(())
}

#[test]
fn exports_iterator_kind_filters() -> Result<()> {
    let mut store = Store::default();
    let module = Module::new(&store, ALL_KINDS_WAT)?;
    let instance = Instance::new(&mut store, &module, &imports! {})?;

    assert_eq!(instance.exports.iter().functions().count(), 1);
    assert_eq!(instance.exports.iter().globals().count(), 1);
    assert_eq!(instance.exports.iter().tables().count(), 1);
    assert_eq!(instance.exports.iter().memories().count(), 1);

    let (name, _function) = instance.exports.iter().functions().next().unwrap();
    assert_eq!(name, "func");

    Ok(())
}

#[test]
fn thirteen_exports_of_mixed_kinds() -> Result<()> {
    let mut store = Store::default();
    let module = Module::new(
        &store,
        r#"
        (module
          (func (export "f1"))
          (func (export "f2") (param i32) (result i32) local.get 0)
          (func (export "f3") (param i64))
          (global (export "g1") i32 (i32.const 1))
          (global (export "g2") (mut i64) (i64.const 2))
          (global (export "g3") f32 (f32.const 3))
          (global (export "g4") f64 (f64.const 4))
          (table (export "t1") 1 funcref)
          (table (export "t2") 2 4 funcref)
          (memory (export "m1") 1)
          (func (export "f4"))
          (global (export "g5") i32 (i32.const 5))
          (func (export "f5")))
        "#,
    )?;
    let instance = Instance::new(&mut store, &module, &imports! {})?;

    assert_eq!(instance.exports.len(), 13);
    assert_eq!(instance.exports.len(), module.exports().count());

    Ok(())
}

#[test]
fn missing_export_error_message() -> Result<()> {
    let mut store = Store::default();
    let module = Module::new(&store, ALL_KINDS_WAT)?;
    let instance = Instance::new(&mut store, &module, &imports! {})?;

    let error = instance.exports.get_function("foo").unwrap_err();
    assert!(matches!(error, ExportError::Missing(_)));
    assert_eq!(error.to_string(), "Export `foo` does not exist.");

    // The message is kind-agnostic.
    let error = instance.exports.get_memory("foo").unwrap_err();
    assert_eq!(error.to_string(), "Export `foo` does not exist.");

    Ok(())
}

#[test]
fn lookup_is_case_sensitive() -> Result<()> {
    let mut store = Store::default();
    let module = Module::new(&store, ALL_KINDS_WAT)?;
    let instance = Instance::new(&mut store, &module, &imports! {})?;

    assert!(instance.exports.contains("glob"));
    assert!(!instance.exports.contains("Glob"));
    let error = instance.exports.get_global("GLOB").unwrap_err();
    assert_eq!(error.to_string(), "Export `GLOB` does not exist.");

    Ok(())
}

#[test]
fn mismatched_kind_lookup_fails() -> Result<()> {
    let mut store = Store::default();
    let module = Module::new(&store, ALL_KINDS_WAT)?;
    let instance = Instance::new(&mut store, &module, &imports! {})?;

    // `glob` exists but is a global, not a function.
    let error = instance.exports.get_function("glob").unwrap_err();
    assert!(matches!(error, ExportError::IncompatibleType));

    assert!(instance.exports.get_global("func").is_err());
    assert!(instance.exports.get_table("mem").is_err());
    assert!(instance.exports.get_memory("tab").is_err());

    // The untyped accessor still hands the extern out.
    assert!(matches!(
        instance.exports.get_extern("glob"),
        Some(Extern::Global(_))
    ));

    Ok(())
}

#[test]
fn exports_views_are_equal_not_cloned() -> Result<()> {
    let mut store = Store::default();
    let module = Module::new(&store, ALL_KINDS_WAT)?;
    let instance = Instance::new(&mut store, &module, &imports! {})?;

    let exports1 = instance.exports.clone();
    let exports2 = instance.exports.clone();
    assert_eq!(exports1, exports2);
    assert_eq!(exports1, instance.exports);

    let other = instance.clone();
    assert_eq!(other.exports, instance.exports);
    assert_eq!(other, instance);

    // A different instantiation owns a different export table.
    let second = Instance::new(&mut store, &module, &imports! {})?;
    assert_ne!(second.exports, instance.exports);

    Ok(())
}

#[test]
fn missing_import_is_a_link_error() -> Result<()> {
    let mut store = Store::default();
    let module = Module::new(
        &store,
        r#"(module (import "env" "missing" (func (param i32))))"#,
    )?;

    let error = Instance::new(&mut store, &module, &imports! {}).unwrap_err();
    match error {
        InstantiationError::Link(LinkError::Import(ns, name, ImportError::UnknownImport(_))) => {
            assert_eq!(ns, "env");
            assert_eq!(name, "missing");
        }
        error => panic!("unexpected error: {error:?}"),
    }

    Ok(())
}

#[test]
fn kind_mismatched_import_is_a_link_error() -> Result<()> {
    let mut store = Store::default();
    let module = Module::new(&store, r#"(module (import "env" "thing" (global i32)))"#)?;

    // Provide a function where a global is expected.
    let imports = imports! {
        "env" => {
            "thing" => Function::new(&mut store, FuncType::new([], []), |_| Ok(vec![])),
        },
    };

    let error = Instance::new(&mut store, &module, &imports).unwrap_err();
    match error {
        InstantiationError::Link(LinkError::Import(
            ns,
            name,
            ImportError::IncompatibleType(expected, found),
        )) => {
            assert_eq!(ns, "env");
            assert_eq!(name, "thing");
            assert!(matches!(expected, ExternType::Global(_)));
            assert!(matches!(found, ExternType::Func(_)));
        }
        error => panic!("unexpected error: {error:?}"),
    }

    Ok(())
}

#[test]
fn failing_start_function_aborts_instantiation() -> Result<()> {
    let mut store = Store::default();
    let module = Module::new(&store, r#"(module (func $main unreachable) (start $main))"#)?;

    let error = Instance::new(&mut store, &module, &imports! {}).unwrap_err();
    assert!(matches!(error, InstantiationError::Start(_)));

    Ok(())
}

#[test]
fn host_function_import_is_callable_from_wasm() -> Result<()> {
    let mut store = Store::default();

    let sum = Function::new(
        &mut store,
        FuncType::new([ValType::I32, ValType::I32], [ValType::I32]),
        |args| {
            let lhs = args[0].i32().unwrap();
            let rhs = args[1].i32().unwrap();
            Ok(vec![Val::I32(lhs + rhs)])
        },
    );

    let module = Module::new(
        &store,
        r#"
        (module
          (import "env" "sum" (func $sum (param i32 i32) (result i32)))
          (func (export "add_three") (param i32) (result i32)
            local.get 0
            i32.const 3
            call $sum))
        "#,
    )?;

    let imports = imports! {
        "env" => {
            "sum" => sum,
        },
    };
    let instance = Instance::new(&mut store, &module, &imports)?;

    let add_three = instance.exports.get_function("add_three")?;
    let results = add_three.call(&mut store, &[Val::I32(39)])?;
    assert_eq!(results[0].i32(), Some(42));

    Ok(())
}

#[test]
fn imported_global_is_visible_through_reexport() -> Result<()> {
    let mut store = Store::default();
    let value = Global::new(&mut store, Val::I32(42));

    let module = Module::new(
        &store,
        r#"
        (module
          (import "env" "value" (global i32))
          (export "out" (global 0)))
        "#,
    )?;

    let imports = imports! {
        "env" => {
            "value" => value,
        },
    };
    let instance = Instance::new(&mut store, &module, &imports)?;

    let out = instance.exports.get_global("out")?;
    assert_eq!(out.get(&store).i32(), Some(42));

    Ok(())
}

#[test]
fn imports_resolve_in_module_declaration_order() -> Result<()> {
    let mut store = Store::default();
    let module = Module::new(
        &store,
        r#"
        (module
          (import "env" "g" (global i32))
          (import "env" "f" (func)))
        "#,
    )?;

    let imports = imports! {
        "env" => {
            "f" => Function::new(&mut store, FuncType::new([], []), |_| Ok(vec![])),
            "g" => Global::new(&mut store, Val::I32(0)),
        },
    };

    let resolved = imports.imports_for_module(&store, &module).unwrap();
    assert_eq!(resolved.len(), 2);
    assert!(matches!(resolved[0], Extern::Global(_)));
    assert!(matches!(resolved[1], Extern::Function(_)));

    Ok(())
}

#[test]
fn first_declared_missing_import_surfaces_first() -> Result<()> {
    let mut store = Store::default();
    let module = Module::new(
        &store,
        r#"
        (module
          (import "env" "zz" (func))
          (import "env" "aa" (func)))
        "#,
    )?;

    // Both imports are missing; resolution walks the declaration
    // order, so `zz` is reported, not the alphabetically first `aa`.
    let error = Instance::new(&mut store, &module, &imports! {}).unwrap_err();
    match error {
        InstantiationError::Link(LinkError::Import(ns, name, _)) => {
            assert_eq!(ns, "env");
            assert_eq!(name, "zz");
        }
        error => panic!("unexpected error: {error:?}"),
    }

    Ok(())
}

#[test]
fn instance_module_accessor() -> Result<()> {
    let mut store = Store::default();
    let module = Module::new(&store, ALL_KINDS_WAT)?;
    let instance = Instance::new(&mut store, &module, &imports! {})?;

    assert_eq!(instance.module().exports().count(), 4);

    Ok(())
}
