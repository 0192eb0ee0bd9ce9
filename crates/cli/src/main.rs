//! Cuckoo entry point
//!
//! Dispatch happens in the library on `argv[0]`; this only sets up error
//! reporting and hands over the raw argument vector.

fn main() {
    // Configure miette for install-mode error reporting
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(false)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))
    .ok();

    let code = cuckoo::run(std::env::args_os().collect());
    std::process::exit(code);
}
