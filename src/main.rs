use clap::Parser;
use pansite::{config, decode::TagRegistry, generate};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pansite")]
#[command(about = "Static site generator gluing pandoc and front-matter templates")]
#[command(long_about = "\
Static site generator gluing pandoc and front-matter templates

Markdown files with YAML front matter go in, pandoc-converted HTML comes
out. Pages marked `index: true` aggregate their siblings' front matter
through a template body; with `mustache_rerender`, every converted page
gets a final template pass over its own front matter.

Content structure:

  config.yml                       # Build config; all paths relative to it
  resources/
  ├── header.html                  # pandoc --include-in-header
  ├── before-body.html             # pandoc --include-before-body
  └── after-body.html              # pandoc --include-after-body
  content/
  ├── home.md                      # Page → public/home.html
  ├── blog.md                      # index: true → aggregates blog.*.md
  ├── blog.post1.md                # Sibling of blog.md (shared stem)
  └── blog.post2.md
  public/                          # Generated HTML lands here

An index page's body is a template over `children`, one entry per sibling,
each carrying that sibling's front matter plus `__filename__`:

  {% for child in children %}
  - [{{ child.title }}]({{ child.__filename__ }})
  {% endfor %}

Requires pandoc on PATH.")]
#[command(version)]
struct Cli {
    /// Build configuration file (YAML)
    config: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let tags = TagRegistry::with_builtins();
    let config = config::load_config(&cli.config, &tags)?;

    println!(
        "==> Building {} → {}",
        config.content.display(),
        config.public.display()
    );
    let report = generate::build(&config, &tags)?;
    println!("==> Build complete: {} pages", report.pages.len());

    Ok(())
}
