//! Sandboxing launcher argument augmentation
//!
//! sailjail only reports the firejail hand-off when verbose and logging to
//! stderr, so those flags are inserted right after the launcher token.

/// Launcher tokens recognized in the command line
pub const SAILJAIL_BINARIES: &[&str] = &["sailjail", "/usr/bin/sailjail"];

pub const OUTPUT_FLAG: &str = "--output=stderr";
pub const VERBOSE_FLAG: &str = "-v";

fn is_verbose(arg: &str) -> bool {
    arg.starts_with("-v") || arg == "--verbose"
}

/// Insert launcher logging flags after the first sailjail token
///
/// `-v` is skipped when any later argument already looks verbose. That scan
/// cannot tell launcher arguments from application arguments, so an
/// application `-v` also counts. Returns whether the arguments changed.
pub fn augment_launcher_args(args: &mut Vec<String>) -> bool {
    let Some(position) = args
        .iter()
        .position(|arg| SAILJAIL_BINARIES.contains(&arg.as_str()))
    else {
        return false;
    };

    let following = &args[position + 1..];
    let needs_verbose = !following.iter().any(|arg| is_verbose(arg));
    let needs_output = !following.iter().any(|arg| arg == OUTPUT_FLAG);

    let mut inserted = Vec::with_capacity(2);
    if needs_output {
        inserted.push(OUTPUT_FLAG.to_string());
    }
    if needs_verbose {
        inserted.push(VERBOSE_FLAG.to_string());
    }
    if inserted.is_empty() {
        return false;
    }

    tracing::debug!("Adding {:?} after launcher at argument {}", inserted, position);
    for flag in inserted.into_iter().rev() {
        args.insert(position + 1, flag);
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_inserts_after_launcher() {
        let mut command = args(&["sailjail", "-p", "demo", "app"]);
        assert!(augment_launcher_args(&mut command));
        assert_eq!(
            command,
            args(&["sailjail", "--output=stderr", "-v", "-p", "demo", "app"])
        );
    }

    #[test]
    fn test_full_path_behind_invoker() {
        let mut command = args(&["invoker", "--type=qt5", "/usr/bin/sailjail", "-p", "x", "x"]);
        assert!(augment_launcher_args(&mut command));
        assert_eq!(
            command,
            args(&[
                "invoker",
                "--type=qt5",
                "/usr/bin/sailjail",
                "--output=stderr",
                "-v",
                "-p",
                "x",
                "x"
            ])
        );
    }

    #[test]
    fn test_existing_verbose_kept() {
        let mut command = args(&["sailjail", "--verbose", "-p", "demo", "app"]);
        augment_launcher_args(&mut command);
        assert_eq!(
            command,
            args(&["sailjail", "--output=stderr", "--verbose", "-p", "demo", "app"])
        );

        let mut command = args(&["sailjail", "-p", "demo", "app", "-vv"]);
        augment_launcher_args(&mut command);
        assert_eq!(command.iter().filter(|a| a.as_str() == "-v").count(), 0);
    }

    #[test]
    fn test_already_augmented_unchanged() {
        let mut command = args(&["sailjail", "--output=stderr", "-v", "app"]);
        assert!(!augment_launcher_args(&mut command));
        assert_eq!(command, args(&["sailjail", "--output=stderr", "-v", "app"]));
    }

    #[test]
    fn test_no_launcher_unchanged() {
        let mut command = args(&["my_application", "-v"]);
        assert!(!augment_launcher_args(&mut command));
        assert_eq!(command, args(&["my_application", "-v"]));
    }

    #[test]
    fn test_similar_names_ignored() {
        let mut command = args(&["/opt/bin/sailjail", "app"]);
        assert!(!augment_launcher_args(&mut command));
        let mut command = args(&["notsailjail", "app"]);
        assert!(!augment_launcher_args(&mut command));
    }
}
