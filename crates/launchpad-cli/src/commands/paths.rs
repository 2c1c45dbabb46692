use crate::context::AppContext;

/// Print where everything lives for this deployment.
pub fn run(ctx: &AppContext) {
    let layout = &ctx.layout;
    println!("root:           {}", layout.root().display());
    println!("cache:          {}", layout.cache_root().display());
    println!("version record: {}", layout.version_file().display());
    println!("archive:        {}", layout.archive_path().display());
    println!("tree:           {}", layout.tree_dir().display());
    println!(
        "overlay:        {} -> {}",
        layout.overlay_source().display(),
        layout.overlay_dest().display()
    );
    println!("entry point:    {}", ctx.launcher().entry_point().display());
}
