//! Binding metadata read from Rust source with `syn`

use super::{
    Accessor, ArrayElement, BindingLayer, ConstantKind, FunctionPointerType, HeaderConstant,
    LayoutConstant, NativeType,
};
use crate::error::{Location, WeldError, WeldResult};
use indexmap::IndexMap;
use proc_macro2::Span;
use quote::ToTokens;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use syn::spanned::Spanned;
use syn::{
    Attribute, Expr, ExprLit, FnArg, GenericArgument, ImplItem, Item, Lit, Meta, PathArguments,
    ReturnType, Stmt, Type, UnOp, UseTree, Visibility,
};

/// Name of the associated constant holding a native structure's layout
const LAYOUT_CONSTANT: &str = "LAYOUT";

/// A binding layer parsed from one Rust source file
#[derive(Debug, Clone, Default)]
pub struct RustBindings {
    header_module: String,
    types: Vec<(String, NativeType)>,
    function_pointers: Vec<(String, FunctionPointerType)>,
    constants: Vec<HeaderConstant>,
    layouts: IndexMap<String, LayoutConstant>,
}

impl RustBindings {
    /// Read the binding file mounted at `module` (e.g. `crate::sys`)
    ///
    /// `header` is the simple name of the inline header module.
    pub fn from_file(path: impl AsRef<Path>, module: &str, header: &str) -> WeldResult<Self> {
        let path = path.as_ref();
        let source = fs::read_to_string(path)?;
        Self::from_source(&source, module, header, Some(path))
    }

    /// Read bindings from source text
    pub fn from_source(
        source: &str,
        module: &str,
        header: &str,
        file: Option<&Path>,
    ) -> WeldResult<Self> {
        let syntax = syn::parse_file(source).map_err(|e| WeldError::Syn {
            file: file.map(Path::to_path_buf).unwrap_or_default(),
            message: e.to_string(),
        })?;

        let mut reader = Reader {
            file: file.map(Path::to_path_buf),
            header: header.to_string(),
            bindings: RustBindings {
                header_module: format!("{}::{}", module, header),
                ..Default::default()
            },
            impls: HashMap::new(),
        };
        reader.read_items(&syntax.items, module, &HashMap::new());
        Ok(reader.finish())
    }

    /// Look up a native type by simple name in any module
    pub fn native_type(&self, name: &str) -> Option<&NativeType> {
        self.types
            .iter()
            .map(|(_, native)| native)
            .find(|native| native.name == name)
    }
}

impl BindingLayer for RustBindings {
    fn native_types(&self, module: &str) -> Vec<&NativeType> {
        self.types
            .iter()
            .filter(|(owner, _)| owner == module)
            .map(|(_, native)| native)
            .collect()
    }

    fn function_pointer_types(&self, module: &str) -> Vec<&FunctionPointerType> {
        self.function_pointers
            .iter()
            .filter(|(owner, _)| owner == module)
            .map(|(_, pointer)| pointer)
            .collect()
    }

    fn header_constants(&self) -> &[HeaderConstant] {
        &self.constants
    }

    fn header_module(&self) -> &str {
        &self.header_module
    }

    fn layout_constant(&self, type_name: &str) -> Option<&LayoutConstant> {
        self.layouts.get(type_name)
    }
}

struct Reader {
    file: Option<PathBuf>,
    header: String,
    bindings: RustBindings,
    /// Accessors and layout flag per qualified type path, attached at the end
    impls: HashMap<String, (Vec<Accessor>, bool)>,
}

impl Reader {
    fn location(&self, span: Span) -> Location {
        let start = span.start();
        Location {
            file: self.file.clone(),
            line: Some(start.line),
            column: Some(start.column),
        }
    }

    fn read_items(&mut self, items: &[Item], module: &str, inherited: &HashMap<String, String>) {
        let mut imports = inherited.clone();
        for item in items {
            if let Item::Use(item) = item {
                collect_use(&item.tree, module, &mut Vec::new(), &mut imports);
            }
        }

        for item in items {
            match item {
                Item::Struct(item) if is_public(&item.vis) => {
                    let (documentation, documentation_line) = documentation(&item.attrs);
                    let name = item.ident.to_string();
                    let native = NativeType {
                        path: format!("{}::{}", module, name),
                        name,
                        documentation,
                        documentation_line: documentation_line
                            .unwrap_or_else(|| item.ident.span().start().line),
                        accessors: Vec::new(),
                        has_layout: false,
                        location: self.location(item.ident.span()),
                    };
                    self.bindings.types.push((module.to_string(), native));
                }
                Item::Impl(item) if item.trait_.is_none() => {
                    let Some(name) = self_type_name(&item.self_ty) else {
                        continue;
                    };
                    let path = format!("{}::{}", module, name);
                    for impl_item in &item.items {
                        match impl_item {
                            ImplItem::Fn(function) if is_public(&function.vis) => {
                                let accessor = Accessor {
                                    name: function.sig.ident.to_string(),
                                    params: function
                                        .sig
                                        .inputs
                                        .iter()
                                        .filter_map(|input| match input {
                                            FnArg::Typed(typed) => {
                                                Some(print_type(&typed.ty, &imports))
                                            }
                                            FnArg::Receiver(_) => None,
                                        })
                                        .collect(),
                                    return_type: match &function.sig.output {
                                        ReturnType::Default => None,
                                        ReturnType::Type(_, ty) => Some(print_type(ty, &imports)),
                                    },
                                    location: self.location(function.sig.ident.span()),
                                };
                                self.impls.entry(path.clone()).or_default().0.push(accessor);
                            }
                            ImplItem::Const(constant) if constant.ident == LAYOUT_CONSTANT => {
                                self.impls.entry(path.clone()).or_default().1 = true;
                            }
                            _ => {}
                        }
                    }
                }
                Item::Type(item) if is_public(&item.vis) && is_function_pointer(&item.ty) => {
                    let name = item.ident.to_string();
                    let pointer = FunctionPointerType {
                        path: format!("{}::{}", module, name),
                        name,
                        location: self.location(item.ident.span()),
                    };
                    self.bindings
                        .function_pointers
                        .push((module.to_string(), pointer));
                }
                Item::Mod(item) => {
                    let Some((_, content)) = &item.content else {
                        continue;
                    };
                    let nested = format!("{}::{}", module, item.ident);
                    if item.ident == self.header {
                        self.bindings.header_module = nested.clone();
                        self.read_header(content, &nested, &imports);
                    } else {
                        self.read_items(content, &nested, &imports);
                    }
                }
                _ => {}
            }
        }
    }

    fn read_header(&mut self, items: &[Item], module: &str, inherited: &HashMap<String, String>) {
        let mut imports = inherited.clone();
        for item in items {
            if let Item::Use(item) = item {
                collect_use(&item.tree, module, &mut Vec::new(), &mut imports);
            }
        }

        for item in items {
            match item {
                Item::Const(item) if is_public(&item.vis) => {
                    let name = item.ident.to_string();
                    let type_name = print_type(&item.ty, &imports);
                    if let Some(element) = layout_element(&item.ty) {
                        let layout = LayoutConstant {
                            path: format!("{}::{}", module, name),
                            name: name.clone(),
                            element,
                        };
                        self.bindings.layouts.entry(name).or_insert(layout);
                        continue;
                    }

                    let (documentation, _) = documentation(&item.attrs);
                    self.bindings.constants.push(HeaderConstant {
                        name,
                        module: module.to_string(),
                        type_name,
                        value: literal_value(&item.expr),
                        documentation,
                        kind: ConstantKind::Const,
                        location: self.location(item.ident.span()),
                    });
                }
                Item::Fn(item) if is_public(&item.vis) && item.sig.inputs.is_empty() => {
                    let ReturnType::Type(_, ty) = &item.sig.output else {
                        continue;
                    };
                    let value = match item.block.stmts.last() {
                        Some(Stmt::Expr(expr, None)) => literal_value(expr),
                        _ => None,
                    };
                    let (documentation, _) = documentation(&item.attrs);
                    self.bindings.constants.push(HeaderConstant {
                        name: item.sig.ident.to_string(),
                        module: module.to_string(),
                        type_name: print_type(ty, &imports),
                        value,
                        documentation,
                        kind: ConstantKind::Function,
                        location: self.location(item.sig.ident.span()),
                    });
                }
                _ => {}
            }
        }
    }

    fn finish(mut self) -> RustBindings {
        for (_, native) in &mut self.bindings.types {
            if let Some((accessors, has_layout)) = self.impls.remove(&native.path) {
                native.accessors = accessors;
                native.has_layout = has_layout;
            }
        }
        self.bindings
    }
}

fn is_public(vis: &Visibility) -> bool {
    matches!(vis, Visibility::Public(_))
}

/// Joined `///` text and the line of its first attribute
fn documentation(attrs: &[Attribute]) -> (String, Option<usize>) {
    let mut lines = Vec::new();
    let mut first_line = None;
    for attr in attrs {
        if !attr.path().is_ident("doc") {
            continue;
        }
        let Meta::NameValue(meta) = &attr.meta else {
            continue;
        };
        let Expr::Lit(ExprLit {
            lit: Lit::Str(text),
            ..
        }) = &meta.value
        else {
            continue;
        };
        first_line.get_or_insert_with(|| attr.span().start().line);
        let text = text.value();
        lines.push(text.strip_prefix(' ').unwrap_or(&text).to_string());
    }
    (lines.join("\n"), first_line)
}

fn self_type_name(ty: &Type) -> Option<String> {
    match ty {
        Type::Path(path) => path.path.segments.last().map(|s| s.ident.to_string()),
        _ => None,
    }
}

/// `unsafe extern "C" fn(..)` or `Option<unsafe extern "C" fn(..)>`
fn is_function_pointer(ty: &Type) -> bool {
    match ty {
        Type::BareFn(_) => true,
        Type::Path(path) => path.path.segments.last().is_some_and(|segment| {
            segment.ident == "Option"
                && matches!(
                    &segment.arguments,
                    PathArguments::AngleBracketed(args)
                        if args.args.iter().any(|arg| matches!(arg, GenericArgument::Type(Type::BareFn(_))))
                )
        }),
        Type::Paren(paren) => is_function_pointer(&paren.elem),
        _ => false,
    }
}

/// Element of a `ValueLayout<T>` or `AddressLayout` constant type
fn layout_element(ty: &Type) -> Option<ArrayElement> {
    let Type::Path(path) = ty else {
        return None;
    };
    let segment = path.path.segments.last()?;
    if segment.ident == "AddressLayout" {
        return Some(ArrayElement::Address);
    }
    if segment.ident != "ValueLayout" {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    args.args.iter().find_map(|arg| match arg {
        GenericArgument::Type(Type::Path(element)) => element
            .path
            .get_ident()
            .map(|ident| ArrayElement::Value(ident.to_string())),
        _ => None,
    })
}

fn literal_value(expr: &Expr) -> Option<i64> {
    match expr {
        Expr::Lit(ExprLit {
            lit: Lit::Int(int), ..
        }) => int.base10_parse::<i64>().ok(),
        Expr::Unary(unary) if matches!(unary.op, UnOp::Neg(_)) => {
            literal_value(&unary.expr).and_then(i64::checked_neg)
        }
        Expr::Paren(paren) => literal_value(&paren.expr),
        Expr::Group(group) => literal_value(&group.expr),
        Expr::Cast(cast) => literal_value(&cast.expr),
        Expr::Block(block) => match block.block.stmts.last() {
            Some(Stmt::Expr(expr, None)) => literal_value(expr),
            _ => None,
        },
        _ => None,
    }
}

fn collect_use(
    tree: &UseTree,
    module: &str,
    prefix: &mut Vec<String>,
    imports: &mut HashMap<String, String>,
) {
    match tree {
        UseTree::Path(path) => {
            prefix.push(path.ident.to_string());
            collect_use(&path.tree, module, prefix, imports);
            prefix.pop();
        }
        UseTree::Name(name) => {
            let ident = name.ident.to_string();
            if ident == "self" {
                if let Some(last) = prefix.last() {
                    imports.insert(last.clone(), qualify(prefix, None, module));
                }
            } else {
                imports.insert(ident.clone(), qualify(prefix, Some(&ident), module));
            }
        }
        UseTree::Rename(rename) => {
            let ident = rename.ident.to_string();
            imports.insert(
                rename.rename.to_string(),
                qualify(prefix, Some(&ident), module),
            );
        }
        UseTree::Group(group) => {
            for item in &group.items {
                collect_use(item, module, prefix, imports);
            }
        }
        UseTree::Glob(_) => {}
    }
}

/// Resolve a `use` path, expanding leading `self` and `super`
fn qualify(prefix: &[String], ident: Option<&str>, module: &str) -> String {
    let mut segments: Vec<String> = Vec::new();
    let mut rest = prefix.iter().map(String::as_str).chain(ident).peekable();
    match rest.peek() {
        Some(&"self") => {
            rest.next();
            segments.extend(module.split("::").map(str::to_string));
        }
        Some(&"super") => {
            segments.extend(module.split("::").map(str::to_string));
            while rest.peek() == Some(&"super") {
                rest.next();
                segments.pop();
            }
        }
        _ => {}
    }
    segments.extend(rest.map(str::to_string));
    segments.join("::")
}

/// Print a type as a path, qualifying the leading segment through `imports`
///
/// Lifetimes are dropped, so `Segment<'a>` prints as its bare path.
pub(crate) fn print_type(ty: &Type, imports: &HashMap<String, String>) -> String {
    match ty {
        Type::Path(path) if path.qself.is_none() => {
            let mut printed = Vec::new();
            for (index, segment) in path.path.segments.iter().enumerate() {
                let ident = segment.ident.to_string();
                let ident = match imports.get(&ident) {
                    Some(full) if index == 0 && path.path.leading_colon.is_none() => full.clone(),
                    _ => ident,
                };
                let arguments = match &segment.arguments {
                    PathArguments::AngleBracketed(args) => {
                        let types: Vec<String> = args
                            .args
                            .iter()
                            .filter_map(|arg| match arg {
                                GenericArgument::Type(ty) => Some(print_type(ty, imports)),
                                _ => None,
                            })
                            .collect();
                        if types.is_empty() {
                            String::new()
                        } else {
                            format!("<{}>", types.join(", "))
                        }
                    }
                    _ => String::new(),
                };
                printed.push(format!("{}{}", ident, arguments));
            }
            printed.join("::")
        }
        Type::Reference(reference) => {
            let mutability = if reference.mutability.is_some() { "mut " } else { "" };
            format!("&{}{}", mutability, print_type(&reference.elem, imports))
        }
        Type::Ptr(pointer) => {
            let mutability = if pointer.mutability.is_some() { "mut" } else { "const" };
            format!("*{} {}", mutability, print_type(&pointer.elem, imports))
        }
        Type::Paren(paren) => print_type(&paren.elem, imports),
        Type::Group(group) => print_type(&group.elem, imports),
        Type::Tuple(tuple) if tuple.elems.is_empty() => "()".to_string(),
        other => other.to_token_stream().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::AccessorKind;
    use crate::binding::resolve_bindings;

    const SOURCE: &str = r#"
use lawu_runtime::{Address, Layout, Segment};
use lawu_runtime::layout as layouts;

/// {@snippet :
/// struct VkExtent2D {
///     uint32_t width;
///     uint32_t height;
/// };
/// }
pub struct VkExtent2D;

impl VkExtent2D {
    pub const LAYOUT: Layout = Layout::new(8, 4);

    pub fn width_get(seg: Segment<'_>) -> u32 {
        seg.get(0)
    }

    pub fn width_set(seg: Segment<'_>, value: u32) {
        seg.set(0, value)
    }

    pub fn height_get(seg: Segment<'_>) -> u32 {
        seg.get(4)
    }

    pub fn height_set(seg: Segment<'_>, value: u32) {
        seg.set(4, value)
    }
}

pub type PFN_vkVoidFunction = Option<unsafe extern "C" fn()>;
pub type VkFlags = u32;

pub mod vulkan_h {
    use lawu_runtime::{AddressLayout, ValueLayout};

    /// {@snippet :
    /// enum VkQueueFlagBits.VK_QUEUE_GRAPHICS_BIT = 1;
    /// }
    pub const VK_QUEUE_GRAPHICS_BIT: u32 = 0x1;

    pub fn VK_RESULT_MAX() -> i32 {
        -(5)
    }

    pub const uint32_t: ValueLayout<u32> = super::layouts::U32;
    pub const VkInstance: AddressLayout = AddressLayout;
}

pub mod nested {
    pub struct VkOther;
}
"#;

    fn bindings() -> RustBindings {
        RustBindings::from_source(SOURCE, "crate::sys", "vulkan_h", Some(Path::new("src/sys.rs")))
            .unwrap()
    }

    #[test]
    fn test_native_types_per_module() {
        let bindings = bindings();
        let types = bindings.native_types("crate::sys");
        assert_eq!(types.len(), 1);
        let extent = types[0];
        assert_eq!(extent.path, "crate::sys::VkExtent2D");
        assert!(extent.has_layout);
        assert_eq!(extent.accessors.len(), 4);
        assert!(extent.documentation.starts_with("{@snippet :\nstruct VkExtent2D {"));
        assert_eq!(extent.documentation_line, 5);
        assert_eq!(bindings.native_types("crate::sys::nested").len(), 1);
    }

    #[test]
    fn test_accessor_types_are_qualified() {
        let bindings = bindings();
        let extent = bindings.native_type("VkExtent2D").unwrap();
        let setter = extent.accessor("width_set").unwrap();
        assert_eq!(setter.params, vec!["lawu_runtime::Segment", "u32"]);
        assert_eq!(setter.return_type, None);

        let resolved = resolve_bindings(extent, bindings.separator()).unwrap();
        assert_eq!(resolved["height"].kind, AccessorKind::Value);
        assert_eq!(resolved["height"].raw_type, "u32");
    }

    #[test]
    fn test_function_pointers() {
        let bindings = bindings();
        let pointers = bindings.function_pointer_types("crate::sys");
        assert_eq!(pointers.len(), 1);
        assert_eq!(pointers[0].path, "crate::sys::PFN_vkVoidFunction");
    }

    #[test]
    fn test_header_constants_and_layouts() {
        let bindings = bindings();
        assert_eq!(bindings.header_module(), "crate::sys::vulkan_h");

        let constants = bindings.header_constants();
        assert_eq!(constants.len(), 2);
        assert_eq!(constants[0].value, Some(1));
        assert_eq!(constants[0].kind, ConstantKind::Const);
        assert!(constants[0].documentation.contains("VkQueueFlagBits.VK_QUEUE_GRAPHICS_BIT"));
        assert_eq!(constants[1].value, Some(-5));
        assert_eq!(constants[1].kind, ConstantKind::Function);
        assert_eq!(constants[1].type_name, "i32");

        let layout = bindings.layout_constant("uint32_t").unwrap();
        assert_eq!(layout.path, "crate::sys::vulkan_h::uint32_t");
        assert_eq!(bindings.array_element(layout), ArrayElement::Value("u32".to_string()));
        let handle = bindings.layout_constant("VkInstance").unwrap();
        assert_eq!(handle.element, ArrayElement::Address);
    }

    #[test]
    fn test_invalid_source() {
        let err = RustBindings::from_source("pub struct", "crate::sys", "vulkan_h", None)
            .unwrap_err();
        assert!(matches!(err, WeldError::Syn { .. }));
    }

    #[test]
    fn test_qualify_relative_paths() {
        let prefix = vec!["super".to_string(), "layouts".to_string()];
        assert_eq!(qualify(&prefix, Some("U32"), "crate::sys::vulkan_h"), "crate::sys::layouts::U32");
        let prefix = vec!["self".to_string()];
        assert_eq!(qualify(&prefix, Some("Item"), "crate::sys"), "crate::sys::Item");
    }
}
