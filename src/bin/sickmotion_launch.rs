use sick_motion::cli::{parse_launch_args, ParseArgsResult};
use sick_motion::launcher_ext::{perform, ToastLogNotifier, CTL_PATH_ENV};
use sick_motion::{logging, settings};
use std::path::PathBuf;

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    let action = match parse_launch_args(&args) {
        ParseArgsResult::Parsed(action) => action,
        ParseArgsResult::Usage(usage) => {
            println!("{usage}");
            std::process::exit(1);
        }
    };

    let settings = settings::load_or_default();
    logging::init(settings.debug_logging, settings.log_file.clone());

    let preferred = settings
        .launcher_ctl_path
        .clone()
        .or_else(|| std::env::var_os(CTL_PATH_ENV).map(PathBuf::from));
    if !perform(action, preferred.as_deref(), &ToastLogNotifier) {
        std::process::exit(1);
    }
}
