mod data;
mod error;
mod graphics;
mod math;
mod modes;
mod scene;

use std::process::ExitCode;

use data::Program;

fn main() -> ExitCode {
    #[cfg_attr(not(feature = "terminal"), allow(unused_variables))]
    let log_sink = data::log::init();

    let prog = Program::new(data::config::parse());

    let result = match prog.mode() {
        #[cfg(feature = "terminal")]
        mode if mode.is_con() => modes::console_mode::con_main(prog, log_sink),

        _ => {
            prog.print_startup_info();
            modes::windowed_mode::winit_main(prog)
        }
    };

    if let Err(err) = result {
        log::error!("{err}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
