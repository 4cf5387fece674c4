//! `extbuild classify` command

use anyhow::Result;

use crate::cli::ClassifyArgs;
use extbuild::builder::{PathClassifier, ProjectFiles};
use extbuild::core::SourceInput;
use extbuild::util::GlobalContext;

pub fn execute(args: ClassifyArgs, ctx: &GlobalContext) -> Result<()> {
    let classifier = PathClassifier::new(ctx.root());
    let inputs = args
        .paths
        .into_iter()
        .map(|p| SourceInput::detect(ctx.root(), p));

    let mut files = ProjectFiles::new();
    classifier.add_to_project(&mut files, inputs);

    println!("Headers:");
    for header in files.headers() {
        println!("  {}", header.display());
    }
    println!("Sources:");
    for source in files.sources() {
        println!("  {}", source.display());
    }

    Ok(())
}
