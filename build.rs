fn main() {
    // Only run on Windows
    #[cfg(target_os = "windows")]
    {
        let mut res = winres::WindowsResource::new();
        res.set("ProductName", "Rust Quick Look");
        res.set("FileDescription", "Quick preview window for files and folders in Windows Explorer");
        res.set("LegalCopyright", "Copyright 2026");
        if let Err(e) = res.compile() {
            eprintln!("Warning: Failed to compile Windows resources: {}", e);
        }
    }
}
