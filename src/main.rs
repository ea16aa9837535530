use energy_burden::cli::run_cli;
use energy_burden::fuel::check_physical_constants;
use energy_burden::log;
use human_panic::setup_panic;

fn main() {
    setup_panic!();

    if let Err(err) = check_physical_constants().and_then(|()| run_cli()) {
        if log::is_logger_initialised() {
            ::log::error!("{err:?}");
        } else {
            eprintln!("Error: {err:?}");
        }

        // Terminate program, signalling an error
        std::process::exit(1);
    }
}
