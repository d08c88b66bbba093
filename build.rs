#[cfg(target_os = "windows")]
fn main() {
    use winresource::WindowsResource;

    // Assumes res/geoclock.ico exists
    let mut res = WindowsResource::new();
    res.set_icon("res/geoclock.ico")
        .set("FileDescription", "geoclock CLI")
        .set("ProductName", "geoclock")
        .set("OriginalFilename", "geoclock.exe")
        .set("FileVersion", env!("CARGO_PKG_VERSION"))
        .set("ProductVersion", env!("CARGO_PKG_VERSION"))
        .compile()
        .expect("Failed to embed icon resource");
}

#[cfg(not(target_os = "windows"))]
fn main() {}
