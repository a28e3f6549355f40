//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter     | Implements   | Connects to                       |
//! |-------------|--------------|-----------------------------------|
//! | `fs`        | FileStore    | SPIFFS partition / host dir       |
//! | `time`      | Clock        | ESP32 system timer / `Instant`    |
//! | `log_sink`  | EventSink    | Serial log output                 |
//! | `actuators` | ActuatorPort | LED strips, face, chime (external)|

pub mod actuators;
pub mod fs;
pub mod log_sink;
pub mod time;
