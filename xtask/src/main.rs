use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitCode};

use clap::{Parser, Subcommand, ValueEnum};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// The deployable Lambda: which package/binary to build and where its zip lands.
struct LambdaArtifact {
    package: &'static str,
    binary: &'static str,
    dist_dir: &'static str,
    zip_name: &'static str,
}

const UPDATE_PROFILE_LAMBDA: LambdaArtifact = LambdaArtifact {
    package: "profile_update_lambda",
    binary: "update_profile_lambda",
    dist_dir: "infra/update_profile/dist",
    zip_name: "update_profile.zip",
};

const CORE_PACKAGE: &str = "profile_update_core";

type TaskResult<T = ()> = Result<T, String>;

#[derive(Parser)]
#[command(
    name = "xtask",
    about = "Task runner for the profile update service workspace"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the workspace test suite
    Test,
    /// Run CI checks (fmt, clippy, tests, release build)
    Ci {
        #[arg(value_enum, default_value_t = CiJob::Check)]
        job: CiJob,
    },
    /// Build the update-profile Lambda and zip it as `bootstrap`
    ServerlessPackage {
        /// Target triple of the Lambda runtime
        #[arg(long, default_value = "x86_64-unknown-linux-gnu")]
        target: String,
        /// Package an unoptimised build
        #[arg(long)]
        debug: bool,
    },
}

#[derive(Clone, ValueEnum)]
enum CiJob {
    /// Formatting, clippy, and tests
    Check,
    /// Release build of the Lambda binary for the host target
    Build,
    /// Check followed by build
    All,
}

impl LambdaArtifact {
    fn build(&self, target: Option<&str>, release: bool) -> TaskResult<PathBuf> {
        let mut args = vec!["build", "-p", self.package, "--bin", self.binary];
        if let Some(triple) = target {
            args.extend(["--target", triple]);
        }
        if release {
            args.push("--release");
        }
        cargo(&args)?;
        Ok(self.binary_path(target, release))
    }

    fn binary_path(&self, target: Option<&str>, release: bool) -> PathBuf {
        let mut path = PathBuf::from("target");
        if let Some(triple) = target {
            path.push(triple);
        }
        path.push(if release { "release" } else { "debug" });
        path.push(self.binary);
        path
    }

    fn zip_path(&self) -> PathBuf {
        Path::new(self.dist_dir).join(self.zip_name)
    }
}

fn cargo(args: &[&str]) -> TaskResult {
    eprintln!("+ cargo {}", args.join(" "));
    let status = Command::new("cargo")
        .args(args)
        .status()
        .map_err(|error| format!("failed to execute cargo: {error}"))?;
    if status.success() {
        Ok(())
    } else {
        Err(format!("`cargo {}` exited with {status}", args.join(" ")))
    }
}

fn write_bootstrap_zip(binary_path: &Path, zip_path: &Path) -> TaskResult {
    let binary = fs::read(binary_path)
        .map_err(|error| format!("failed to read '{}': {error}", binary_path.display()))?;
    if let Some(parent) = zip_path.parent() {
        fs::create_dir_all(parent)
            .map_err(|error| format!("failed to create '{}': {error}", parent.display()))?;
    }
    let file = fs::File::create(zip_path)
        .map_err(|error| format!("failed to create '{}': {error}", zip_path.display()))?;

    let mut zip = ZipWriter::new(file);
    let options = FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(0o755);
    zip.start_file("bootstrap", options)
        .map_err(|error| format!("failed to add bootstrap entry: {error}"))?;
    zip.write_all(&binary)
        .map_err(|error| format!("failed to write bootstrap entry: {error}"))?;
    zip.finish()
        .map_err(|error| format!("failed to finish lambda zip: {error}"))?;
    Ok(())
}

fn serverless_package(target: &str, release: bool) -> TaskResult {
    let artifact = &UPDATE_PROFILE_LAMBDA;
    let binary_path = artifact.build(Some(target), release)?;
    let zip_path = artifact.zip_path();
    write_bootstrap_zip(&binary_path, &zip_path)?;
    eprintln!("packaged {}", zip_path.display());
    Ok(())
}

fn ci(job: CiJob) -> TaskResult {
    if matches!(job, CiJob::Check | CiJob::All) {
        cargo(&["fmt", "--all", "--", "--check"])?;
        cargo(&["clippy", "--all-targets", "--", "-D", "warnings"])?;
        cargo(&["test", "-p", CORE_PACKAGE])?;
        cargo(&["test", "-p", UPDATE_PROFILE_LAMBDA.package])?;
    }
    if matches!(job, CiJob::Build | CiJob::All) {
        UPDATE_PROFILE_LAMBDA.build(None, true)?;
    }
    Ok(())
}

fn main() -> ExitCode {
    let result = match Cli::parse().command {
        Commands::Test => cargo(&["test", "--workspace"]),
        Commands::Ci { job } => ci(job),
        Commands::ServerlessPackage { target, debug } => serverless_package(&target, !debug),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("xtask failed: {message}");
            ExitCode::FAILURE
        }
    }
}
