use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{exit, Command, ExitStatus};

use clap::{Parser, Subcommand, ValueEnum};
use deploy_hooks_core::archive::write_tree;
use deploy_hooks_core::contract::SOURCE_TREE_DIR;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

// ── CLI definition ─────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "xtask",
    about = "Task runner for the deployment hooks workspace",
    long_about = "A unified CLI for CI checks and for packaging the deployment\n\
                  hook Lambda binaries into deployable zip artifacts."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run CI checks (fmt, clippy, tests)
    Ci,
    /// Build the hook binaries and package one Lambda zip per function
    Package {
        /// Compilation target triple for Lambda binaries
        #[arg(long, default_value = "x86_64-unknown-linux-gnu")]
        target: String,
        /// Build profile used for binaries
        #[arg(value_enum, long, default_value_t = BuildProfile::Release)]
        profile: BuildProfile,
        /// Source tree bundled as `src/` into the archiving functions
        #[arg(long, env = "HOOKS_SOURCE_DIR")]
        source_dir: Option<PathBuf>,
        /// Output directory for the zip artifacts
        #[arg(long, default_value = "dist")]
        out_dir: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum BuildProfile {
    Debug,
    Release,
}

impl BuildProfile {
    fn dir_name(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Release => "release",
        }
    }

    fn as_cargo_flag(self) -> Option<&'static str> {
        match self {
            Self::Debug => None,
            Self::Release => Some("--release"),
        }
    }
}

struct LambdaFunction {
    bin: &'static str,
    bundles_source: bool,
}

const LAMBDA_FUNCTIONS: [LambdaFunction; 4] = [
    LambdaFunction {
        bin: "bootstrap_lambda",
        bundles_source: true,
    },
    LambdaFunction {
        bin: "source_trigger_lambda",
        bundles_source: true,
    },
    LambdaFunction {
        bin: "source_upload_lambda",
        bundles_source: true,
    },
    LambdaFunction {
        bin: "runner_update_lambda",
        bundles_source: false,
    },
];

// ── helpers ────────────────────────────────────────────────────────

fn step(label: &str) {
    eprintln!("\n=== {label} ===");
}

fn cargo(args: &[&str]) -> ExitStatus {
    eprintln!("+ cargo {}", args.join(" "));
    Command::new("cargo")
        .args(args)
        .status()
        .expect("failed to execute cargo")
}

fn run_cargo(args: &[&str]) {
    let status = cargo(args);
    if !status.success() {
        exit(status.code().unwrap_or(1));
    }
}

fn package_lambdas(
    target: &str,
    profile: BuildProfile,
    source_dir: Option<&Path>,
    out_dir: &Path,
) {
    ensure_rust_target_installed(target);
    ensure_c_linker_available(target);

    step("Build deployment hook binaries");

    let mut cargo_args = vec!["build", "-p", "deploy_hooks_lambda", "--target", target];
    for function in &LAMBDA_FUNCTIONS {
        cargo_args.push("--bin");
        cargo_args.push(function.bin);
    }
    if let Some(flag) = profile.as_cargo_flag() {
        cargo_args.push(flag);
    }
    run_cargo(&cargo_args);

    step("Package Lambda zip artifacts");
    let target_dir = Path::new("target").join(target).join(profile.dir_name());
    fs::create_dir_all(out_dir).expect("failed to create lambda dist directory");

    let mut packaged = Vec::with_capacity(LAMBDA_FUNCTIONS.len());
    for function in &LAMBDA_FUNCTIONS {
        let zip_path = out_dir.join(format!("{}.zip", function.bin));
        let bundled = if function.bundles_source {
            source_dir
        } else {
            None
        };
        package_lambda_zip(
            &target_dir.join(binary_name(function.bin, target)),
            bundled,
            &zip_path,
        );
        packaged.push(zip_path);
    }

    if source_dir.is_none() {
        eprintln!(
            "\nwarning: no --source-dir given; archiving functions will fail until `{SOURCE_TREE_DIR}/` is added to their package"
        );
    }

    eprintln!("\nPackaged artifacts:");
    for path in packaged {
        eprintln!("- {}", path.display());
    }
}

fn ensure_rust_target_installed(target: &str) {
    let output = Command::new("rustup")
        .args(["target", "list", "--installed"])
        .output();

    let output = match output {
        Ok(value) => value,
        Err(error) => {
            eprintln!(
                "warning: failed to run `rustup target list --installed` ({error}); continuing without target preflight"
            );
            return;
        }
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        panic!(
            "failed to list installed rust targets; run `rustup target list --installed` manually. details: {}",
            stderr.trim()
        );
    }

    let installed = String::from_utf8_lossy(&output.stdout);
    if !installed.lines().any(|line| line.trim() == target) {
        panic!(
            "required rust target `{target}` is not installed. install it with `rustup target add {target}` and re-run `cargo run -p xtask -- package`"
        );
    }
}

fn ensure_c_linker_available(target: &str) {
    if !cfg!(windows) || !target.ends_with("unknown-linux-gnu") {
        return;
    }

    let env_override_keys = [
        format!("CC_{}", target.replace('-', "_")),
        format!("CC_{target}"),
        "TARGET_CC".to_string(),
        "CC".to_string(),
    ];

    for key in env_override_keys {
        if let Ok(value) = std::env::var(&key) {
            let candidate = value.trim();
            if candidate.is_empty() {
                continue;
            }
            if tool_works(candidate) {
                return;
            }
        }
    }

    let canonical = "x86_64-linux-gnu-gcc";
    if tool_works(canonical) {
        return;
    }

    panic!(
        "missing C cross-linker for target `{target}`. install `{canonical}` (or set CC_x86_64_unknown_linux_gnu) before running `cargo run -p xtask -- package`.\n\
         Tip: the AWS SDK's TLS stack (aws-lc-sys) requires a Linux C toolchain when cross-compiling from Windows."
    );
}

fn tool_works(program: &str) -> bool {
    let mut parts = program.split_whitespace();
    let Some(bin) = parts.next() else {
        return false;
    };
    let args: Vec<&str> = parts.collect();

    Command::new(bin)
        .args(&args)
        .arg("--version")
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}

fn binary_name(bin_name: &str, target: &str) -> String {
    if target.contains("windows") {
        format!("{bin_name}.exe")
    } else {
        bin_name.to_string()
    }
}

fn package_lambda_zip(binary_path: &Path, source_dir: Option<&Path>, zip_path: &Path) {
    if !binary_path.exists() {
        panic!("expected lambda binary at '{}'", binary_path.display());
    }

    let binary = fs::read(binary_path).expect("failed to read lambda binary");
    let file = fs::File::create(zip_path).expect("failed to create lambda zip");
    let mut zip = ZipWriter::new(file);
    let options = FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(0o755);
    zip.start_file("bootstrap", options)
        .expect("failed to start bootstrap entry in lambda zip");
    zip.write_all(&binary)
        .expect("failed to write bootstrap entry");

    if let Some(source_dir) = source_dir {
        let counts = write_tree(&mut zip, source_dir, SOURCE_TREE_DIR, zip_path)
            .unwrap_or_else(|error| panic!("failed to bundle source tree: {error}"));
        eprintln!(
            "+ bundled {} files from {} into {}",
            counts.files,
            source_dir.display(),
            zip_path.display()
        );
    }

    zip.finish().expect("failed to finish lambda zip");
}

// ── CI jobs ────────────────────────────────────────────────────────

fn ci_check() {
    step("Check formatting");
    run_cargo(&["fmt", "--all", "--", "--check"]);

    step("Clippy");
    run_cargo(&[
        "clippy",
        "--all-targets",
        "--all-features",
        "--",
        "-D",
        "warnings",
    ]);

    step("Test deploy_hooks_core");
    run_cargo(&["test", "-p", "deploy_hooks_core"]);

    step("Test deploy_hooks_lambda");
    run_cargo(&["test", "-p", "deploy_hooks_lambda"]);
}

// ── main ───────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Ci => {
            ci_check();
            eprintln!("\nCI job passed.");
        }
        Commands::Package {
            target,
            profile,
            source_dir,
            out_dir,
        } => {
            package_lambdas(&target, profile, source_dir.as_deref(), &out_dir);
        }
    }
}
