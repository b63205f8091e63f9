use lawu_weld::build::GeneratorBuilder;

fn main() {
    let report = GeneratorBuilder::from_config("lawu.toml")
        .and_then(GeneratorBuilder::build)
        .expect("Failed to generate Vulkan wrappers");

    if report.diagnostics.has_errors() {
        panic!(
            "{} structure(s) could not be generated; see the warnings above",
            report.diagnostics.error_count()
        );
    }
}
