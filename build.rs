fn main() {
    // Propagate ESP-IDF sysenv to dependent build steps.
    // Host-target builds (tests) skip this entirely.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
