use std::io::Write;
use std::path::{Path, PathBuf};

use clap::CommandFactory;

use crate::Cli;

const BIN_NAME: &str = "starport";

fn write_stdout(bytes: &[u8]) -> std::io::Result<()> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(bytes)?;
    stdout.flush()
}

fn completion_script(shell: clap_complete::Shell) -> Vec<u8> {
    let mut cmd = Cli::command();
    let mut script = Vec::new();
    clap_complete::generate(shell, &mut cmd, BIN_NAME, &mut script);
    script
}

/// Page names `generate_to` produces: the root page plus one per visible
/// subcommand, e.g. `starport-export.1`.
fn man_page_names() -> Vec<String> {
    let cmd = Cli::command();
    std::iter::once(format!("{BIN_NAME}.1"))
        .chain(
            cmd.get_subcommands()
                .filter(|sub| !sub.is_hide_set())
                .map(|sub| format!("{BIN_NAME}-{}.1", sub.get_name())),
        )
        .collect()
}

fn render_root_man_page() -> std::io::Result<Vec<u8>> {
    let mut page = Vec::new();
    clap_mangen::Man::new(Cli::command()).render(&mut page)?;
    Ok(page)
}

fn write_man_pages(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;
    clap_mangen::generate_to(Cli::command(), dir)?;
    Ok(man_page_names()
        .into_iter()
        .map(|name| dir.join(name))
        .filter(|path| path.exists())
        .collect())
}

pub(crate) fn handle_completions(
    shell: clap_complete::Shell,
) -> Result<(), Box<dyn std::error::Error>> {
    write_stdout(&completion_script(shell))?;
    Ok(())
}

pub(crate) fn handle_man(output: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let Some(dir) = output else {
        write_stdout(&render_root_man_page()?)?;
        return Ok(());
    };

    let written = write_man_pages(&dir)?;
    println!("Wrote {} man pages to {}:", written.len(), dir.display());
    for path in &written {
        if let Some(name) = path.file_name() {
            println!("  {}", name.to_string_lossy());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bash_completion_offers_every_subcommand() {
        let script = String::from_utf8(completion_script(clap_complete::Shell::Bash)).unwrap();
        for sub in ["page", "all", "export", "completions", "man"] {
            assert!(script.contains(sub), "missing {sub} in bash completion");
        }
        assert!(script.contains("--page-cap"));
    }

    #[test]
    fn man_page_names_cover_subcommands() {
        let names = man_page_names();
        assert_eq!(names[0], "starport.1");
        assert!(names.contains(&"starport-export.1".to_string()));
        assert!(names.contains(&"starport-page.1".to_string()));
        assert!(names.contains(&"starport-all.1".to_string()));
    }

    #[test]
    fn root_man_page_carries_long_description() {
        let page = String::from_utf8(render_root_man_page().unwrap()).unwrap();
        assert!(page.to_lowercase().contains(".th starport"));
        assert!(page.contains("safety cap"));
    }

    #[test]
    fn write_man_pages_creates_one_file_per_command() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("man1");

        let written = write_man_pages(&out).unwrap();

        assert!(written.contains(&out.join("starport.1")));
        assert!(written.contains(&out.join("starport-export.1")));
        assert!(written.iter().all(|path| path.is_file()));
    }
}
