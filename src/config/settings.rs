//! Compile-time constants describing the managed installation.

/// File name of the user service unit that runs the display process.
pub const SERVICE_UNIT: &str = "turing-screen.service";

/// Runtime interpreter looked up on `PATH`.
pub const RUNTIME_PROGRAM: &str = "python3.11";

/// Required runtime `(major, minor)` version.
pub const RUNTIME_VERSION: (u32, u32) = (3, 11);

/// Hint shown when the runtime is missing.
pub const RUNTIME_INSTALL_HINT: &str = "sudo zypper install python311";

/// Isolated runtime environment, relative to the checkout.
pub const VENV_DIR: &str = "venv";

/// File that must exist at the checkout root.
pub const ANCHOR_FILE: &str = "main.py";

/// Directory that must exist at the checkout root.
pub const ANCHOR_DIR: &str = "library";

/// Project dependency manifest, relative to the checkout.
pub const REQUIREMENTS_FILE: &str = "requirements.txt";

/// GUI toolkit required by the tray application.
pub const GUI_PACKAGE: &str = "PyQt5";

/// GPU telemetry package, installed only on NVIDIA hosts.
pub const GPU_TELEMETRY_PACKAGE: &str = "nvidia-ml-py";

/// Free-space floor at the checkout path; below it is a warning.
pub const MIN_FREE_BYTES: u64 = 500 * 1024 * 1024;

/// Group granting serial/USB access, used as fallback to the device rule.
pub const USB_GROUP: &str = "dialout";

/// System packages installed through the package manager.
pub const SYSTEM_PACKAGES: &[&str] = &["python311-devel", "python311-tk", "gcc", "sensors"];

/// Word that must be typed exactly to delete the checkout.
pub const CONFIRMATION_WORD: &str = "REMOVE";

/// Service unit template, relative to the checkout.
pub const SERVICE_TEMPLATE: &str = "packaging/turing-screen.service.in";

/// Desktop entry template, relative to the checkout.
pub const DESKTOP_TEMPLATE: &str = "packaging/turing-smart-screen.desktop.in";

/// Scalable application icon, relative to the checkout.
pub const ICON_SOURCE: &str = "assets/icons/turing-smart-screen.svg";

/// Device-permission rule for the supported USB display controllers.
pub const DEVICE_RULE: &str = "\
# Turing Smart Screen: allow the logged-in user to open the display's serial port
SUBSYSTEM==\"tty\", ATTRS{idVendor}==\"1a86\", ATTRS{idProduct}==\"5722\", MODE=\"0666\", TAG+=\"uaccess\"
SUBSYSTEM==\"tty\", ATTRS{idVendor}==\"1d6b\", ATTRS{idProduct}==\"0121\", MODE=\"0666\", TAG+=\"uaccess\"
SUBSYSTEM==\"tty\", ATTRS{idVendor}==\"1a86\", ATTRS{idProduct}==\"ca21\", MODE=\"0666\", TAG+=\"uaccess\"
";
