use std::io::Write;

fn main() {
    let mut out = std::io::stdout().lock();
    let mut err = std::io::stderr().lock();
    let code = headsup_cli::run(std::env::args(), &mut out, &mut err);
    let _ = out.flush();
    std::process::exit(code);
}
