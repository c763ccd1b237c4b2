use hull::engine::RunError;
use hull::ui;

fn main() {
    let argv: Vec<String> = std::env::args().skip(1).collect();
    if let Err(err) = hull::cli::run(argv) {
        let code = match err.downcast_ref::<RunError>() {
            Some(run_err) => {
                if !run_err.is_silent() {
                    ui::error(run_err);
                }
                run_err.exit_code()
            }
            None => {
                ui::error(&err);
                1
            }
        };
        std::process::exit(code);
    }
}
