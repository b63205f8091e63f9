//! GeneratorBuilder for build.rs scripts
//!
//! This module runs the whole pipeline: read the bindings, scan the crate,
//! fill the registry, then emit one file per request plus the indexes.

use super::config::{
    Directive, GeneratorConfig, MappingOverride, DEFAULT_BINDINGS_MODULE, DEFAULT_HEADER_MODULE,
};
use super::scan::ExistingTypes;
use crate::binding::{match_members, resolve_bindings, BindingLayer, NativeType, RustBindings};
use crate::classify::classify_members;
use crate::codegen::{
    module_directory, write_atomically, Artifact, EnumGenerator, IndexGenerator,
    StructureGenerator,
};
use crate::diagnostics::{Diagnostic, DiagnosticSeverity, DiagnosticsCollector};
use crate::error::{WeldError, WeldResult};
use crate::naming::{
    convert_structure_name, is_core_function_pointer_name, is_core_name, to_snake_case,
};
use crate::parse::{parse_documentation, Declaration, StructMember};
use crate::registry::{add_header_requests, Destination, GenerationRequest, MappingRegistry, RequestKind};
use chrono::Utc;
use std::collections::BTreeSet;
use std::env;
use std::path::{Path, PathBuf};

/// What a generator run produced
#[derive(Debug, Default)]
pub struct GenerationReport {
    /// Files written, enums and flags first
    pub written: Vec<Artifact>,
    /// Index files, one per destination module
    pub indexes: Vec<PathBuf>,
    pub diagnostics: DiagnosticsCollector,
}

impl GenerationReport {
    /// The artifact generated from a native name
    pub fn artifact(&self, native: &str) -> Option<&Artifact> {
        self.written.iter().find(|artifact| artifact.native == native)
    }
}

/// Builder for a generator run
///
/// Simplifies build.rs scripts by handling:
/// - binding and existing-type scanning
/// - registry population in scan order
/// - per-request generation with diagnostics
/// - cargo:rerun-if-changed directives
///
/// # Example
/// ```ignore
/// use lawu_weld::build::GeneratorBuilder;
///
/// fn main() {
///     GeneratorBuilder::new("src/sys.rs")
///         .header_destination("crate::vk")
///         .generate_core("crate::sys", "crate::vk")
///         .scan_existing("src")
///         .build()
///         .expect("Failed to generate wrapper types");
/// }
/// ```
#[derive(Debug, Clone)]
pub struct GeneratorBuilder {
    bindings: PathBuf,
    bindings_module: String,
    header_module: String,
    header_destination: Option<String>,
    directives: Vec<Directive>,
    mappings: Vec<MappingOverride>,
    existing_sources: Vec<PathBuf>,
    out_dir: Option<PathBuf>,
    timestamp: Option<String>,
    watch: Vec<PathBuf>,
}

impl GeneratorBuilder {
    /// Create a builder for the binding source at `bindings`
    pub fn new(bindings: impl AsRef<Path>) -> Self {
        Self {
            bindings: bindings.as_ref().to_path_buf(),
            bindings_module: DEFAULT_BINDINGS_MODULE.to_string(),
            header_module: DEFAULT_HEADER_MODULE.to_string(),
            header_destination: None,
            directives: Vec::new(),
            mappings: Vec::new(),
            existing_sources: Vec::new(),
            out_dir: None,
            timestamp: None,
            watch: Vec::new(),
        }
    }

    /// Create a builder from a `lawu.toml` file
    pub fn from_config(path: impl AsRef<Path>) -> WeldResult<Self> {
        let path = path.as_ref();
        let config = GeneratorConfig::from_file(path)?;
        let mut builder = Self::from(config);
        builder.watch.push(path.to_path_buf());
        Ok(builder)
    }

    /// Module path the binding source is mounted at
    pub fn bindings_module(mut self, module: impl Into<String>) -> Self {
        self.bindings_module = module.into();
        self
    }

    /// Simple name of the header module inside the bindings
    pub fn header_module(mut self, module: impl Into<String>) -> Self {
        self.header_module = module.into();
        self
    }

    /// Module that header enums and flags are generated into
    pub fn header_destination(mut self, module: impl Into<String>) -> Self {
        self.header_destination = Some(module.into());
        self
    }

    /// Generate the core structures of `source` into `destination`
    pub fn generate_core(mut self, source: impl Into<String>, destination: impl Into<String>) -> Self {
        self.directives.push(Directive {
            source: source.into(),
            destination: destination.into(),
        });
        self
    }

    /// Map a native name to an existing type
    pub fn map_structure(mut self, native: impl Into<String>, target: impl Into<String>) -> Self {
        self.mappings.push(MappingOverride {
            native: native.into(),
            target: target.into(),
        });
        self
    }

    /// Scan a source root for existing types and `#[map_structure]`
    pub fn scan_existing(mut self, root: impl AsRef<Path>) -> Self {
        self.existing_sources.push(root.as_ref().to_path_buf());
        self
    }

    /// Write output here instead of `OUT_DIR`
    pub fn out_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.out_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Use a fixed provenance timestamp
    pub fn timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    /// Run the generator
    ///
    /// This will:
    /// 1. Read the bindings and scan the existing sources
    /// 2. Populate the mapping registry
    /// 3. Generate enum and flag requests, then structure requests
    /// 4. Write one index per destination module
    /// 5. Print cargo directives when run from a build script
    pub fn build(self) -> WeldResult<GenerationReport> {
        let out_dir = match &self.out_dir {
            Some(dir) => dir.clone(),
            None => env::var("OUT_DIR")
                .map(PathBuf::from)
                .map_err(|_| WeldError::EnvVarMissing("OUT_DIR".to_string()))?,
        };
        let date = self
            .timestamp
            .clone()
            .unwrap_or_else(|| Utc::now().to_rfc3339());

        let bindings =
            RustBindings::from_file(&self.bindings, &self.bindings_module, &self.header_module)?;
        let existing = ExistingTypes::scan(&self.existing_sources)?;

        let mut report = GenerationReport::default();
        let registry = populate_registry(
            &bindings,
            &existing,
            &self.mappings,
            &self.directives,
            self.header_destination.as_deref(),
            &mut report.diagnostics,
        );

        let generator = Generator {
            bindings: &bindings,
            registry: &registry,
            out_dir: &out_dir,
            date: &date,
        };
        generator.run(&mut report)?;

        if env::var_os("OUT_DIR").is_some() {
            self.print_cargo_directives(&existing, &report);
        }
        Ok(report)
    }

    fn print_cargo_directives(&self, existing: &ExistingTypes, report: &GenerationReport) {
        println!("cargo:rerun-if-changed={}", self.bindings.display());
        for path in self.watch.iter().chain(&self.existing_sources) {
            println!("cargo:rerun-if-changed={}", path.display());
        }
        for file in &existing.files {
            println!("cargo:rerun-if-changed={}", file.display());
        }
        for diagnostic in report
            .diagnostics
            .diagnostics()
            .iter()
            .filter(|diagnostic| diagnostic.severity != DiagnosticSeverity::Note)
        {
            println!("cargo:warning={}", diagnostic.format());
        }
    }
}

impl From<GeneratorConfig> for GeneratorBuilder {
    fn from(config: GeneratorConfig) -> Self {
        Self {
            bindings: config.bindings,
            bindings_module: config.bindings_module,
            header_module: config.header.module,
            header_destination: config.header.destination,
            directives: config.generate,
            mappings: config.mapping,
            existing_sources: config.existing_sources,
            out_dir: config.out_dir,
            timestamp: None,
            watch: Vec::new(),
        }
    }
}

/// Fill a registry from every input, in scan order
///
/// 1. explicit overrides, configured ones before scanned attributes
/// 2. function pointers of each source module
/// 3. header flags and enums
/// 4. structures of each source module
///
/// Rejected entries are reported and skipped.
pub fn populate_registry(
    bindings: &dyn BindingLayer,
    existing: &ExistingTypes,
    overrides: &[MappingOverride],
    directives: &[Directive],
    header_destination: Option<&str>,
    diagnostics: &mut DiagnosticsCollector,
) -> MappingRegistry {
    let mut registry = MappingRegistry::new().with_materialized(existing.materialized.iter().cloned());

    for mapping in overrides {
        if let Err(err) = registry.add_mapping(&mapping.native, &mapping.target) {
            diagnostics.report(&err);
        }
    }
    for mapping in &existing.mappings {
        if let Err(err) = registry.add_mapping(&mapping.key, &mapping.path) {
            diagnostics.add(Diagnostic::from(&err).at_location(&mapping.location));
        }
    }

    for directive in directives {
        for pointer in bindings.function_pointer_types(&directive.source) {
            if !is_core_function_pointer_name(&pointer.name) {
                continue;
            }
            if let Err(err) = registry.add_function_pointer(&pointer.name, &pointer.path) {
                diagnostics.report(&err);
            }
        }
    }

    if let Some(destination) = header_destination {
        for err in add_header_requests(&mut registry, bindings, destination) {
            diagnostics.report(&err);
        }
    }

    for directive in directives {
        for native in bindings.native_types(&directive.source) {
            if !is_core_name(&native.name) || !native.has_layout {
                tracing::debug!(native = %native.name, "not a core structure");
                continue;
            }
            let request = GenerationRequest {
                native: native.name.clone(),
                source_module: directive.source.clone(),
                destination: Destination::new(
                    directive.destination.clone(),
                    convert_structure_name(&native.name),
                ),
                kind: RequestKind::Structure,
                location: native.location.clone(),
            };
            if let Err(err) = registry.add_request(request) {
                diagnostics.report(&err);
            }
        }
    }

    diagnostics.extend(registry.take_notes());
    registry
}

/// Generation over a frozen registry
pub struct Generator<'a> {
    pub bindings: &'a dyn BindingLayer,
    pub registry: &'a MappingRegistry,
    pub out_dir: &'a Path,
    pub date: &'a str,
}

impl Generator<'_> {
    /// Generate every request and the indexes
    ///
    /// Failed requests become diagnostics; I/O failures end the run.
    pub fn run(&self, report: &mut GenerationReport) -> WeldResult<()> {
        let (structures, others): (Vec<&GenerationRequest>, Vec<&GenerationRequest>) = self
            .registry
            .requests()
            .partition(|request| request.kind == RequestKind::Structure);

        for request in others.into_iter().chain(structures) {
            match self.render(request) {
                Ok((text, exports)) => {
                    let artifact = self.write(request, &text, exports)?;
                    report.written.push(artifact);
                }
                Err(err) if err.is_fatal() => return Err(err),
                Err(err) => {
                    tracing::warn!(native = %request.native, "generation failed: {}", err);
                    report.diagnostics.report(&err);
                }
            }
        }

        let modules: BTreeSet<&str> = report
            .written
            .iter()
            .map(|artifact| artifact.module.as_str())
            .collect();
        let mut indexes = Vec::new();
        for module in modules {
            let index = IndexGenerator::new(module, &report.written);
            let path = self.out_dir.join(index.directory()).join("mod.rs");
            write_atomically(&path, &index.generate())?;
            indexes.push(path);
        }
        report.indexes = indexes;
        Ok(())
    }

    /// Source text and exported names for one request
    pub fn render(&self, request: &GenerationRequest) -> WeldResult<(String, Vec<String>)> {
        if let Some(generator) = EnumGenerator::new(request, self.date) {
            return Ok((generator.generate(), generator.exports()));
        }

        let native = self
            .bindings
            .native_types(&request.source_module)
            .into_iter()
            .find(|native| native.name == request.native)
            .ok_or_else(|| WeldError::NoMatchingDeclaration {
                native: request.native.clone(),
                location: request.location.clone(),
            })?;
        let members = declared_members(native)?;

        let separator = self.bindings.separator();
        let resolved = resolve_bindings(native, separator)?;
        match_members(native, &members, &resolved)?;
        let classified = classify_members(native, &members, &resolved, self.registry, self.bindings)?;

        let generator = StructureGenerator::new(native, request, &classified, separator, self.date);
        Ok((generator.generate(), generator.exports()))
    }

    fn write(
        &self,
        request: &GenerationRequest,
        text: &str,
        exports: Vec<String>,
    ) -> WeldResult<Artifact> {
        let module = &request.destination.module;
        let path = self
            .out_dir
            .join(module_directory(module))
            .join(format!("{}.rs", to_snake_case(&request.destination.name)));
        write_atomically(&path, text)?;
        tracing::info!(native = %request.native, destination = %request.destination, "generated");
        Ok(Artifact {
            native: request.native.clone(),
            module: module.clone(),
            exports,
            path,
        })
    }
}

/// Members of the structure body a native type documents
///
/// Follows one typedef when the body is declared under another tag.
fn declared_members(native: &NativeType) -> WeldResult<Vec<StructMember>> {
    let declarations = parse_documentation(&native.documentation).map_err(|e| WeldError::Parse {
        native: native.name.clone(),
        message: e.message.clone(),
        location: native.documentation_location(e.line, e.column),
    })?;

    let body = |name: &str| {
        declarations.iter().find_map(|declaration| match declaration {
            Declaration::StructOrUnion { name: tag, members } if tag == name => Some(members.clone()),
            _ => None,
        })
    };
    body(&native.name)
        .or_else(|| {
            declarations.iter().find_map(|declaration| match declaration {
                Declaration::TypeDefinition { name, alias } if *name == native.name => body(alias),
                _ => None,
            })
        })
        .ok_or_else(|| WeldError::NoMatchingDeclaration {
            native: native.name.clone(),
            location: native.location.clone(),
        })
}
