// ==========================================
// 模块化结构配置器 - 命令行入口
// ==========================================
// 用法:
//   modular-configurator validate <file|->
//   modular-configurator solve <file|-> [--max-solutions N] [--max-candidates N] [--breadth N] [--parallel]
//   modular-configurator generate <file|->
//   modular-configurator health
// 通用参数: --config <path> 指定配置文件
// 结果以 JSON 输出到 stdout, 日志输出到 stderr
// ==========================================

use anyhow::Context;
use modular_configurator::api::{ApiError, ConfiguratorApi};
use modular_configurator::config::{ConfigManager, SolverOptions};
use modular_configurator::{i18n, logging};
use serde::Serialize;
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

const USAGE: &str = "usage: modular-configurator <validate|solve|generate> <file|-> [--config PATH] \
[--max-solutions N] [--max-candidates N] [--breadth N] [--parallel]\n       modular-configurator health [--config PATH]";

// ==========================================
// 命令行参数
// ==========================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Validate,
    Solve,
    Generate,
    Health,
}

#[derive(Debug, Default)]
struct CliArgs {
    command: Option<Command>,
    input: Option<String>,
    config: Option<PathBuf>,
    max_solutions: Option<usize>,
    max_candidates: Option<usize>,
    breadth: Option<usize>,
    parallel: bool,
}

impl CliArgs {
    fn parse(args: impl IntoIterator<Item = String>) -> Result<Self, String> {
        let mut parsed = CliArgs::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" => parsed.config = Some(PathBuf::from(value_of(&arg, args.next())?)),
                "--max-solutions" => parsed.max_solutions = Some(number_of(&arg, args.next())?),
                "--max-candidates" => parsed.max_candidates = Some(number_of(&arg, args.next())?),
                "--breadth" => parsed.breadth = Some(number_of(&arg, args.next())?),
                "--parallel" => parsed.parallel = true,
                flag if flag.starts_with("--") => return Err(format!("unknown flag: {}", flag)),
                word if parsed.command.is_none() => {
                    parsed.command = Some(match word {
                        "validate" => Command::Validate,
                        "solve" => Command::Solve,
                        "generate" => Command::Generate,
                        "health" => Command::Health,
                        other => return Err(format!("unknown command: {}", other)),
                    });
                }
                word if parsed.input.is_none() => parsed.input = Some(word.to_string()),
                extra => return Err(format!("unexpected argument: {}", extra)),
            }
        }

        match parsed.command {
            None => Err("missing command".to_string()),
            Some(Command::Health) => Ok(parsed),
            Some(_) if parsed.input.is_none() => Err("missing input (file path or -)".to_string()),
            Some(_) => Ok(parsed),
        }
    }

    /// 命令行参数覆写配置中的求解参数
    fn solver_options(&self, mut options: SolverOptions) -> SolverOptions {
        if let Some(n) = self.max_solutions {
            options = options.with_max_solutions(n);
        }
        if let Some(n) = self.max_candidates {
            options = options.with_max_candidates(n);
        }
        if let Some(n) = self.breadth {
            options = options.with_dimension_breadth(n);
        }
        if self.parallel {
            options = options.with_parallel(true);
        }
        options
    }
}

fn value_of(flag: &str, value: Option<String>) -> Result<String, String> {
    value.ok_or_else(|| format!("{} requires a value", flag))
}

fn number_of(flag: &str, value: Option<String>) -> Result<usize, String> {
    let raw = value_of(flag, value)?;
    raw.parse::<usize>()
        .map_err(|_| format!("{} expects a non-negative integer, got {:?}", flag, raw))
}

/// 读取请求体 ("-" 表示 stdin)
fn read_input(source: &str) -> anyhow::Result<String> {
    if source == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("cannot read request from stdin")?;
        Ok(buf)
    } else {
        std::fs::read_to_string(source)
            .with_context(|| format!("cannot read request file {}", source))
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), ApiError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| ApiError::InternalError(e.to_string()))?;
    println!("{}", text);
    Ok(())
}

// ==========================================
// 主流程
// ==========================================

fn run(cli: CliArgs) -> Result<(), ApiError> {
    let manager = ConfigManager::load(cli.config.as_deref())?;
    i18n::set_locale(&manager.config().locale);

    let mut config = manager.config().clone();
    config.solver = cli.solver_options(config.solver);
    let api = ConfiguratorApi::bootstrap(&config)?;

    let command = cli
        .command
        .ok_or_else(|| ApiError::InvalidInput("missing command".to_string()))?;
    if command == Command::Health {
        return print_json(&api.health());
    }

    let source = cli.input.as_deref().unwrap_or("-");
    let raw = read_input(source)?;

    match command {
        Command::Validate => print_json(&api.validate_json(&raw)?),
        Command::Solve => print_json(&api.solve_json(&raw)?),
        Command::Generate => print_json(&api.generate_solutions_json(&raw)?),
        Command::Health => print_json(&api.health()),
    }
}

fn main() -> ExitCode {
    logging::init();

    let cli = match CliArgs::parse(std::env::args().skip(1)) {
        Ok(cli) => cli,
        Err(message) => {
            eprintln!("{}\n{}", message, USAGE);
            return ExitCode::from(2);
        }
    };

    tracing::debug!(command = ?cli.command, version = modular_configurator::VERSION, "启动");

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(code = e.code(), error = %e, "命令执行失败");
            match serde_json::to_string(&e.to_body()) {
                Ok(body) => eprintln!("{}", body),
                Err(_) => eprintln!("{}", e),
            }
            ExitCode::FAILURE
        }
    }
}
