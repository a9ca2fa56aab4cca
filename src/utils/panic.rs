pub fn setup() {
    // Colorized backtraces on panic; this should run before anything else.
    color_backtrace::install();
}
