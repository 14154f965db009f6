use super::*;
use crate::test_helpers::{codes, messages, sp, Fixture};
use jsi_ir::SymbolFlags;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

#[test]
fn suffix_strips_the_shared_packages() {
    assert_eq!(
        distinguishing_suffix("app.ui.Window", "app.Base"),
        ("ui.Window".to_string(), "Base".to_string())
    );
    assert_eq!(
        distinguishing_suffix("app.Window", "lib.Base"),
        ("app.Window".to_string(), "lib.Base".to_string())
    );
}

#[test]
fn suffix_keeps_simple_names() {
    assert_eq!(
        distinguishing_suffix("app.Window", "app.Window"),
        ("Window".to_string(), "Window".to_string())
    );
    assert_eq!(
        distinguishing_suffix("app.Window", "app.Window.Inner"),
        ("Window".to_string(), "Window.Inner".to_string())
    );
}

fn dotted() -> impl Strategy<Value = String> {
    prop::collection::vec("[a-c]{1,2}", 1..5).prop_map(|parts| parts.join("."))
}

proptest! {
    #[test]
    fn suffixes_are_nonempty_tails(own in dotted(), other in dotted()) {
        let (a, b) = distinguishing_suffix(&own, &other);
        prop_assert!(!a.is_empty() && !b.is_empty());
        prop_assert!(own.ends_with(&a));
        prop_assert!(other.ends_with(&b));
    }

    #[test]
    fn suffixes_diverge_at_their_first_segment(own in dotted(), other in dotted()) {
        let (a, b) = distinguishing_suffix(&own, &other);
        let a: Vec<&str> = a.split('.').collect();
        let b: Vec<&str> = b.split('.').collect();
        if a.len() > 1 && b.len() > 1 {
            prop_assert_ne!(a[0], b[0]);
        }
    }
}

#[test]
fn well_formed_js_class_is_marked_once() {
    let mut fx = Fixture::new();
    let window = fx.class(fx.app, "Window", SymbolFlags::empty(), &[fx.defs.js_object_class]);
    let unit = fx.package(vec![fx.class_def(window, Vec::new(), sp(1))]);

    let out = fx.run(unit);
    assert!(out.diagnostics.is_empty());
    assert_eq!(fx.marker_count(window), 1);
}

#[test]
fn marker_goes_first_and_on_the_module_class() {
    let mut fx = Fixture::new();
    let console = fx.module(fx.app, "Console", SymbolFlags::empty(), &[fx.defs.js_object_class]);
    let module_class = fx.symbols.module_class(console);
    fx.symbols.add_annotation(
        module_class,
        jsi_ir::Annotation::new(fx.defs.js_export_annotation, sp(0)),
    );
    let unit = fx.package(vec![fx.module_def(console, Vec::new(), sp(1))]);

    let out = fx.run(unit);
    assert!(out.diagnostics.is_empty());
    let annotations = fx.symbols.annotations(module_class);
    assert_eq!(annotations.len(), 2);
    assert_eq!(annotations[0].class, fx.defs.raw_js_type_annotation);
    assert!(fx.symbols.annotations(console).is_empty());
}

#[test]
fn marker_is_never_duplicated() {
    let mut fx = Fixture::new();
    let window = fx.class(fx.app, "Window", SymbolFlags::empty(), &[fx.defs.js_object_class]);
    let unit = fx.package(vec![
        fx.class_def(window, Vec::new(), sp(1)),
        fx.class_def(window, Vec::new(), sp(2)),
    ]);

    fx.run(unit);
    assert_eq!(fx.marker_count(window), 1);
}

#[test]
fn first_bad_parent_is_reported_once() {
    let mut fx = Fixture::new();
    let base = fx.class(fx.app, "Base", SymbolFlags::empty(), &[fx.defs.object_class]);
    let other = fx.class(fx.app, "Other", SymbolFlags::empty(), &[fx.defs.object_class]);
    let window = fx.class(
        fx.app,
        "Window",
        SymbolFlags::empty(),
        &[fx.defs.js_object_class, base, other],
    );
    let unit = fx.package(vec![fx.class_def(window, Vec::new(), sp(1))]);

    let out = fx.run(unit);
    assert_eq!(
        messages(&out.diagnostics),
        vec!["Window extends Base which does not extend js.Any."]
    );
    assert_eq!(codes(&out.diagnostics), vec![ErrorCode::E7001]);
    assert_eq!(out.diagnostics[0].primary_span(), Some(sp(1)));
    assert_eq!(fx.marker_count(window), 0);
}

#[test]
fn bad_parent_names_use_the_distinguishing_suffix() {
    let mut fx = Fixture::new();
    let ui = fx.symbols.enter_package(fx.app, "ui");
    let window = fx.class(ui, "Window", SymbolFlags::empty(), &[fx.defs.js_any_class, fx.defs.object_class]);
    let unit = fx.package(vec![fx.class_def(window, Vec::new(), sp(1))]);

    let out = fx.run(unit);
    assert_eq!(
        messages(&out.diagnostics),
        vec!["app.ui.Window extends host.Object which does not extend js.Any."]
    );
}

#[test]
fn interop_library_may_extend_anything() {
    let mut fx = Fixture::new();
    let array = fx.class(
        fx.defs.js_package,
        "Array",
        SymbolFlags::empty(),
        &[fx.defs.object_class, fx.defs.js_any_class],
    );
    let unit = fx.package(vec![fx.class_def(array, Vec::new(), sp(1))]);

    let out = fx.run(unit);
    assert!(out.diagnostics.is_empty());
    assert_eq!(fx.marker_count(array), 1);
}

#[test]
fn lambda_adapters_are_exempt() {
    let mut fx = Fixture::new();
    let adapter = fx.class(
        fx.app,
        "$anonfun",
        SymbolFlags::ANONYMOUS | SymbolFlags::SYNTHETIC,
        &[fx.defs.js_function_class, fx.defs.object_class],
    );
    let unit = fx.package(vec![fx.class_def(adapter, Vec::new(), sp(1))]);

    let out = fx.run(unit);
    assert!(out.diagnostics.is_empty());
    assert_eq!(fx.marker_count(adapter), 1);
}

#[test]
fn anonymous_and_case_are_reported_independently() {
    let mut fx = Fixture::new();
    let anon = fx.class(
        fx.app,
        "$anon",
        SymbolFlags::ANONYMOUS | SymbolFlags::CASE,
        &[fx.defs.js_object_class],
    );
    let unit = fx.package(vec![fx.class_def(anon, Vec::new(), sp(1))]);

    let out = fx.run(unit);
    assert_eq!(
        messages(&out.diagnostics),
        vec![
            "Anonymous classes may not extend js.Any",
            "Classes and objects extending js.Any may not have a case modifier",
        ]
    );
    assert_eq!(fx.marker_count(anon), 0);
}

#[test]
fn js_declarations_inside_host_classes_are_rejected() {
    let mut fx = Fixture::new();
    let outer = fx.class(fx.app, "Outer", SymbolFlags::empty(), &[fx.defs.object_class]);
    let inner_class = fx.class(outer, "Inner", SymbolFlags::empty(), &[fx.defs.js_object_class]);
    let inner_module = fx.module(outer, "Facade", SymbolFlags::empty(), &[fx.defs.js_object_class]);
    let body = vec![
        fx.class_def(inner_class, Vec::new(), sp(2)),
        fx.module_def(inner_module, Vec::new(), sp(3)),
    ];
    let unit = fx.package(vec![fx.class_def(outer, body, sp(1))]);

    let out = fx.run(unit);
    assert_eq!(codes(&out.diagnostics), vec![ErrorCode::E7004, ErrorCode::E7004]);
    assert_eq!(
        out.diagnostics
            .iter()
            .map(|d| d.primary_span())
            .collect::<Vec<_>>(),
        vec![Some(sp(2)), Some(sp(3))]
    );
    assert_eq!(fx.marker_count(outer), 0);
}

#[test]
fn js_classes_may_live_in_js_objects() {
    let mut fx = Fixture::new();
    let facade = fx.module(fx.app, "Facade", SymbolFlags::empty(), &[fx.defs.js_object_class]);
    let facade_class = fx.symbols.module_class(facade);
    let inner = fx.class(facade_class, "Inner", SymbolFlags::empty(), &[fx.defs.js_object_class]);
    let unit = fx.package(vec![fx.module_def(facade, vec![fx.class_def(inner, Vec::new(), sp(2))], sp(1))]);

    let out = fx.run(unit);
    assert!(out.diagnostics.is_empty());
    assert_eq!(fx.marker_count(facade), 1);
    assert_eq!(fx.marker_count(inner), 1);
}

#[test]
fn js_bodies_may_not_declare_inner_types() {
    let mut fx = Fixture::new();
    let facade = fx.module(fx.app, "Facade", SymbolFlags::empty(), &[fx.defs.js_object_class]);
    let facade_class = fx.symbols.module_class(facade);
    let helper = fx.class(facade_class, "Helper", SymbolFlags::empty(), &[fx.defs.object_class]);
    let window = fx.class(fx.app, "Window", SymbolFlags::empty(), &[fx.defs.js_object_class]);
    let nested = fx.class(window, "Nested", SymbolFlags::empty(), &[fx.defs.js_object_class]);
    let unit = fx.package(vec![
        fx.module_def(facade, vec![fx.class_def(helper, Vec::new(), sp(2))], sp(1)),
        fx.class_def(window, vec![fx.class_def(nested, Vec::new(), sp(4))], sp(3)),
    ]);

    let out = fx.run(unit);
    assert_eq!(
        messages(&out.diagnostics),
        vec![
            "Traits, classes and objects extending js.Any may not have inner traits, classes or objects",
            "Traits, classes and objects extending js.Any may not have inner traits, classes or objects",
        ]
    );
    assert_eq!(codes(&out.diagnostics), vec![ErrorCode::E7007, ErrorCode::E7007]);
    // The enclosing declarations are still valid.
    assert_eq!(fx.marker_count(facade), 1);
    assert_eq!(fx.marker_count(window), 1);
    assert_eq!(fx.marker_count(nested), 0);
}

#[test]
fn local_js_classes_in_object_methods_are_accepted() {
    let mut fx = Fixture::new();
    let main = fx.module(fx.app, "Main", SymbolFlags::empty(), &[fx.defs.object_class]);
    let main_class = fx.symbols.module_class(main);
    let run = fx.method(main_class, "run", SymbolFlags::empty());
    let local = fx.class(run, "Local", SymbolFlags::LOCAL, &[fx.defs.js_object_class]);
    let block = jsi_ir::Tree::block(vec![fx.class_def(local, Vec::new(), sp(3))], fx.unit(), sp(2));
    let unit = fx.package(vec![fx.module_def(main, vec![fx.def_def(run, block, sp(2))], sp(1))]);

    let out = fx.run(unit);
    assert!(out.diagnostics.is_empty(), "{:?}", out.diagnostics);
    assert_eq!(fx.marker_count(local), 1);
}

#[test]
fn local_anonymous_js_classes_report_only_anonymity() {
    let mut fx = Fixture::new();
    let main = fx.module(fx.app, "Main", SymbolFlags::empty(), &[fx.defs.object_class]);
    let main_class = fx.symbols.module_class(main);
    let run = fx.method(main_class, "run", SymbolFlags::empty());
    let anon = fx.class(
        run,
        "$anon",
        SymbolFlags::LOCAL | SymbolFlags::ANONYMOUS,
        &[fx.defs.js_object_class],
    );
    let block = jsi_ir::Tree::block(vec![fx.class_def(anon, Vec::new(), sp(3))], fx.unit(), sp(2));
    let unit = fx.package(vec![fx.module_def(main, vec![fx.def_def(run, block, sp(2))], sp(1))]);

    let out = fx.run(unit);
    assert_eq!(messages(&out.diagnostics), vec!["Anonymous classes may not extend js.Any"]);
    assert_eq!(codes(&out.diagnostics), vec![ErrorCode::E7002]);
    assert_eq!(fx.marker_count(anon), 0);
}

#[test]
fn only_the_global_object_extends_global_scope() {
    let mut fx = Fixture::new();
    let globals = fx.module(
        fx.app,
        "Globals",
        SymbolFlags::empty(),
        &[fx.defs.js_object_class, fx.defs.js_global_scope_class],
    );
    let global = fx.defs.js_global_module;
    let unit = fx.package(vec![
        fx.module_def(globals, Vec::new(), sp(1)),
        fx.module_def(global, Vec::new(), sp(2)),
    ]);

    let out = fx.run(unit);
    assert_eq!(
        messages(&out.diagnostics),
        vec!["Only the global scope object may extend js.GlobalScope"]
    );
    assert_eq!(out.diagnostics[0].primary_span(), Some(sp(1)));
    assert_eq!(fx.marker_count(globals), 0);
    assert_eq!(fx.marker_count(global), 1);
}

#[test]
fn constructor_parameters_are_allowed() {
    let mut fx = Fixture::new();
    let point = fx.class(fx.app, "Point", SymbolFlags::empty(), &[fx.defs.js_object_class]);
    let ctor = fx.symbols.enter_method(
        point,
        "<init>",
        SymbolFlags::CONSTRUCTOR | SymbolFlags::PRIMARY_CONSTRUCTOR,
        vec![jsi_ir::Ty::Int],
        jsi_ir::Ty::Unit,
    );
    let unit = fx.package(vec![fx.class_def(point, vec![fx.def_def(ctor, fx.unit(), sp(2))], sp(1))]);

    let out = fx.run(unit);
    assert!(out.diagnostics.is_empty());
    assert_eq!(fx.marker_count(point), 1);
}

#[test]
fn structural_problems_of_a_clean_declaration_are_empty() {
    let mut fx = Fixture::new();
    let window = fx.class(fx.app, "Window", SymbolFlags::empty(), &[fx.defs.js_object_class]);
    let decl = fx.class_def(window, Vec::new(), sp(1));
    assert!(structural_problems(&fx.symbols, &fx.defs, &decl, Scope::ROOT).is_empty());
    assert!(!is_lambda_adapter(&fx.symbols, &fx.defs, window));
}
