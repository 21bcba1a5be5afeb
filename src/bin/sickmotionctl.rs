use sick_motion::cli::{confirmation_line, parse_ctl_args, ParseArgsResult};
use sick_motion::{ipc, logging, settings};

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    let action = match parse_ctl_args(&args) {
        ParseArgsResult::Parsed(action) => action,
        ParseArgsResult::Usage(usage) => {
            println!("{usage}");
            std::process::exit(1);
        }
    };

    let settings = settings::load_or_default();
    logging::init(settings.debug_logging, None);

    if let Err(err) = ipc::send_action(action, settings.effective_command_port()) {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
    println!("{}", confirmation_line(action));
}
