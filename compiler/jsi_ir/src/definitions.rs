//! Well-known library symbols the interop pass keys on.
//!
//! `Definitions::install` enters the skeleton of the host standard library
//! (`host.*`) and of the foreign-runtime interop library (`host.js.*`) into a
//! fresh symbol table and remembers the symbols every rule compares against.

use crate::{SymbolFlags, SymbolId, SymbolKind, SymbolTable, Ty};

/// Handles to the well-known symbols.
#[derive(Clone, Debug)]
pub struct Definitions {
    pub host_package: SymbolId,
    pub any_class: SymbolId,
    pub object_class: SymbolId,
    pub class_class: SymbolId,

    pub predef_module: SymbolId,
    /// `Predef.classOf[T]`, the reflective type-token intrinsic.
    pub class_of_method: SymbolId,

    pub enumeration_class: SymbolId,
    /// Result type of the enumeration factories.
    pub enumeration_value_class: SymbolId,
    /// `Value()`
    pub enum_value_no_arg: SymbolId,
    /// `Value(i: Int)`
    pub enum_value_int: SymbolId,
    /// `Value(name: String)`
    pub enum_value_name: SymbolId,
    /// `Value(i: Int, name: String)`
    pub enum_value_int_name: SymbolId,

    pub js_package: SymbolId,
    pub js_prim_package: SymbolId,
    /// The interop marker type.
    pub js_any_class: SymbolId,
    pub js_object_class: SymbolId,
    /// The dynamic proxy type.
    pub js_dynamic_class: SymbolId,
    pub js_select_dynamic: SymbolId,
    pub js_apply_dynamic: SymbolId,
    /// Base of every foreign-runtime function type.
    pub js_function_class: SymbolId,
    /// The global-scope marker type.
    pub js_global_scope_class: SymbolId,
    /// The one object allowed to extend the global-scope marker.
    pub js_global_module: SymbolId,

    pub js_export_annotation: SymbolId,
    /// Marker the code generator uses to recognise interop types.
    pub raw_js_type_annotation: SymbolId,
}

impl Definitions {
    /// Enter the library skeleton into `table`.
    pub fn install(table: &mut SymbolTable) -> Definitions {
        let none = SymbolFlags::empty();
        let root = SymbolId::ROOT;

        let host_package = table.enter_package(root, "host");
        let any_class = table.enter_class(host_package, "Any", SymbolKind::Class, SymbolFlags::ABSTRACT, Vec::new());
        let object_class = table.enter_class(
            host_package,
            "Object",
            SymbolKind::Class,
            none,
            vec![Ty::Class(any_class)],
        );
        let class_class = table.enter_class(
            host_package,
            "Class",
            SymbolKind::Class,
            none,
            vec![Ty::Class(object_class)],
        );

        let predef_module = table.enter_module(host_package, "Predef", none, vec![Ty::Class(object_class)]);
        let predef_class = table.module_class(predef_module);
        let class_of_method = table.enter_method(predef_class, "classOf", none, Vec::new(), Ty::Class(class_class));
        table.enter_type_param(class_of_method, "T");

        let enumeration_class = table.enter_class(
            host_package,
            "Enumeration",
            SymbolKind::Class,
            SymbolFlags::ABSTRACT,
            vec![Ty::Class(object_class)],
        );
        let enumeration_value_class = table.enter_class(
            enumeration_class,
            "Value",
            SymbolKind::Class,
            SymbolFlags::ABSTRACT,
            vec![Ty::Class(object_class)],
        );
        let value_ty = Ty::Class(enumeration_value_class);
        let factory = SymbolFlags::PROTECTED;
        let enum_value_no_arg = table.enter_method(enumeration_class, "Value", factory, Vec::new(), value_ty.clone());
        let enum_value_int = table.enter_method(enumeration_class, "Value", factory, vec![Ty::Int], value_ty.clone());
        let enum_value_name = table.enter_method(enumeration_class, "Value", factory, vec![Ty::Str], value_ty.clone());
        let enum_value_int_name =
            table.enter_method(enumeration_class, "Value", factory, vec![Ty::Int, Ty::Str], value_ty);

        let js_package = table.enter_package(host_package, "js");
        let js_prim_package = table.enter_package(js_package, "prim");
        let js_any_class = table.enter_class(
            js_package,
            "Any",
            SymbolKind::Trait,
            none,
            vec![Ty::Class(object_class)],
        );
        let js_object_class = table.enter_class(
            js_package,
            "Object",
            SymbolKind::Class,
            none,
            vec![Ty::Class(object_class), Ty::Class(js_any_class)],
        );
        let js_dynamic_class = table.enter_class(
            js_package,
            "Dynamic",
            SymbolKind::Trait,
            none,
            vec![Ty::Class(js_any_class)],
        );
        let dynamic_ty = Ty::Class(js_dynamic_class);
        let js_select_dynamic =
            table.enter_method(js_dynamic_class, "selectDynamic", none, vec![Ty::Str], dynamic_ty.clone());
        let js_apply_dynamic = table.enter_method(
            js_dynamic_class,
            "applyDynamic",
            none,
            vec![Ty::Str],
            Ty::method(vec![Ty::Repeated(Box::new(Ty::Class(any_class)))], dynamic_ty),
        );
        let js_function_class = table.enter_class(
            js_package,
            "Function",
            SymbolKind::Class,
            none,
            vec![Ty::Class(js_object_class)],
        );
        let js_global_scope_class = table.enter_class(
            js_package,
            "GlobalScope",
            SymbolKind::Trait,
            none,
            vec![Ty::Class(js_object_class)],
        );
        let js_global_module = table.enter_module(
            js_package,
            "global",
            none,
            vec![Ty::Class(js_object_class), Ty::Class(js_global_scope_class)],
        );

        let js_annotation_package = table.enter_package(js_package, "annotation");
        let js_export_annotation = table.enter_class(
            js_annotation_package,
            "JSExport",
            SymbolKind::Class,
            none,
            vec![Ty::Class(object_class)],
        );
        let raw_js_type_annotation = table.enter_class(
            js_annotation_package,
            "RawJSType",
            SymbolKind::Class,
            none,
            vec![Ty::Class(object_class)],
        );

        Definitions {
            host_package,
            any_class,
            object_class,
            class_class,
            predef_module,
            class_of_method,
            enumeration_class,
            enumeration_value_class,
            enum_value_no_arg,
            enum_value_int,
            enum_value_name,
            enum_value_int_name,
            js_package,
            js_prim_package,
            js_any_class,
            js_object_class,
            js_dynamic_class,
            js_select_dynamic,
            js_apply_dynamic,
            js_function_class,
            js_global_scope_class,
            js_global_module,
            js_export_annotation,
            raw_js_type_annotation,
        }
    }

    /// Packages whose declarations may extend non-interop parents.
    pub fn is_interop_library_package(&self, package: SymbolId) -> bool {
        package == self.js_package || package == self.js_prim_package
    }
}
