fn main() {
    slint_build::compile("ui/glance.slint").expect("failed to compile slint ui");
}
