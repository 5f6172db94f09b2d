//! Fixed names shared by the configuration and the adapters

/// Configuration directory name below the platform config dir
pub const CONFIG_DIR_NAME: &str = "mak";
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Variable the configure adapters read their build directory from
pub const BUILD_DIR_VAR: &str = "BUILD_DIR";

/// Default build type list for dependency generation
pub const DEFAULT_BUILD_TYPE: &str = "Debug";

/// Variables imported from the invoking shell into every run
pub const DEFAULT_IMPORT_ENV: &[&str] = &[
    "CC",
    "CXX",
    "DISPLAY",
    "GID",
    "HOME",
    "HOST",
    "HOSTNAME",
    "LANG",
    "LC_ADDRESS",
    "LC_ALL",
    "LC_MEASUREMENT",
    "LC_MONETARY",
    "LC_NUMERIC",
    "LC_PAPER",
    "LC_TELEPHONE",
    "LC_TIME",
    "PATH",
    "SHELL",
    "SSH_AGENT_PID",
    "SSH_AUTH_SOCK",
    "TERM",
    "TTY",
    "UID",
    "USER",
    "USERNAME",
    "WAYLAND_DISPLAY",
    "XDG_CACHE_HOME",
    "XDG_CONFIG_DIRS",
    "XDG_CONFIG_HOME",
    "XDG_DATA_DIRS",
    "XDG_DATA_HOME",
    "XDG_DESKTOP_DIR",
    "XDG_DOCUMENTS_DIR",
    "XDG_DOWNLOAD_DIR",
    "XDG_MUSIC_DIR",
    "XDG_PICTURES_DIR",
    "XDG_PUBLICSHARE_DIR",
    "XDG_RUNTIME_DIR",
    "XDG_STATE_HOME",
    "XDG_TEMPLATES_DIR",
    "XDG_VIDEOS_DIR",
];

pub const ENV_BUILD_DIR: &str = "MAK_BUILD_DIR";
pub const ENV_COLOR: &str = "MAK_COLOR";
pub const ENV_IMPORT_ENV: &str = "MAK_IMPORT_ENV";
pub const ENV_CONAN_PROFILE: &str = "MAK_CONAN_PROFILE";
