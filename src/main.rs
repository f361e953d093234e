use plotspec::console::{parse_args, print_usage, show_intro};
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::init();
    let result = parse_args(std::env::args_os()).and_then(|args| {
        args.map_or(Ok(None), |args| {
            show_intro();
            plotspec::run(args).map(Some)
        })
    });
    match result {
        Ok(Some(_)) => {
            println!("Processing completed successfully!");
            ExitCode::SUCCESS
        }
        Ok(None) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            print_usage();
            ExitCode::FAILURE
        }
    }
}
