fn main() {
    println!("cargo:rerun-if-changed=resources/app.manifest");

    if std::env::var("CARGO_CFG_TARGET_OS").as_deref() == Ok("windows") {
        let mut res = winres::WindowsResource::new();
        res.set_manifest_file("resources/app.manifest");

        if let Err(error) = res.compile() {
            panic!("failed to compile Windows resources: {error}");
        }
    }
}
