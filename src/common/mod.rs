pub mod io;


/// Reset SIGPIPE to default behavior (SIG_DFL) so `fradix | head` exits
/// quietly instead of panicking on a closed stdout.
/// Rust sets SIGPIPE to SIG_IGN by default. Call at the start of main().
#[inline]
pub fn reset_sigpipe() {
    #[cfg(unix)]
    unsafe {
        libc::signal(libc::SIGPIPE, libc::SIG_DFL);
    }
}
