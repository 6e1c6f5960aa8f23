//! Application-wide constants
//!
//! Default file locations, default key codes and the values written by
//! `cabinet-config init`.

/// Configuration file location
pub mod config {
    /// Directory created under the platform config dir
    pub const APP_DIR: &str = "cabinet-config";

    /// Configuration file name
    pub const FILENAME: &str = "config.json";
}

/// Input event codes (from Linux input-event-codes.h)
pub mod input {
    /// KEY_RESERVED, treated as "no key bound"
    pub const UNBOUND: u16 = 0;

    pub const KEY_ENTER: u16 = 28;
    pub const KEY_Z: u16 = 44;
    pub const KEY_X: u16 = 45;
    pub const KEY_C: u16 = 46;
    pub const KEY_V: u16 = 47;
    pub const KEY_F1: u16 = 59;
    pub const KEY_F2: u16 = 60;
    pub const KEY_UP: u16 = 103;
    pub const KEY_LEFT: u16 = 105;
    pub const KEY_RIGHT: u16 = 106;
    pub const KEY_DOWN: u16 = 108;

    /// Name accepted in place of a key name for an unbound role
    pub const UNBOUND_NAME: &str = "UNBOUND";
}

/// Default values
pub mod defaults {
    /// Default key per logical role; arcade buttons start unbound
    pub mod keys {
        use crate::constants::input::*;

        pub const TEST: u16 = KEY_F1;
        pub const START: u16 = KEY_ENTER;
        pub const SERVICE: u16 = KEY_F2;
        pub const UP: u16 = KEY_UP;
        pub const LEFT: u16 = KEY_LEFT;
        pub const DOWN: u16 = KEY_DOWN;
        pub const RIGHT: u16 = KEY_RIGHT;
        pub const BUTTON1: u16 = KEY_Z;
        pub const BUTTON2: u16 = KEY_X;
        pub const BUTTON3: u16 = KEY_C;
        pub const BUTTON4: u16 = KEY_V;
        pub const ARCADE_BUTTON1: u16 = UNBOUND;
        pub const ARCADE_BUTTON2: u16 = UNBOUND;
        pub const ARCADE_BUTTON3: u16 = UNBOUND;
        pub const ARCADE_BUTTON4: u16 = UNBOUND;
        pub const ARCADE_START_BUTTON: u16 = UNBOUND;
    }

    /// Display flags
    pub mod display {
        pub const WINDOWED: bool = false;
        pub const USE_DIRECT_INPUT: bool = false;
    }

    /// Placeholder identity and network values written by `init`
    pub mod template {
        pub const SERIAL: &str = "000000000000";
        pub const PCB_ID: &str = "ABLN0000000";
        pub const TENPO_ROUTER: &str = "";
        pub const AUTH_SERVER_IP: &str = "127.0.0.1";
        pub const IP_ADDRESS: &str = "192.168.0.10";
        pub const SUBNET_MASK: &str = "255.255.255.0";
        pub const GATEWAY: &str = "192.168.0.1";
        pub const PRIMARY_DNS: &str = "192.168.0.1";
        pub const SERVER_ADDRESS: &str = "127.0.0.1:5000";
    }
}

/// Hostname limits (RFC 1123)
pub mod network {
    pub const MAX_HOSTNAME_LEN: usize = 253;
    pub const MAX_LABEL_LEN: usize = 63;
}
