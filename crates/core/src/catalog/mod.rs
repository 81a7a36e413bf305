//! Static catalogs of SDK components a project can pull in.
//!
//! Three tables are defined here:
//! - hardware libraries (peripheral drivers from `hardware/src` of the SDK)
//! - layered drivers (USB class drivers from `drivers/` of the SDK)
//! - third-party libraries (FreeRTOS, lwIP, ...) from `3rdparty/`
//!
//! All tables are immutable; lookups are by exact display name.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Chipset families supported by the SDK.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Chipset {
    #[serde(rename = "FT90x")]
    Ft90x,
    #[serde(rename = "FT93x")]
    Ft93x,
}

impl Chipset {
    pub const ALL: [Chipset; 2] = [Chipset::Ft90x, Chipset::Ft93x];

    pub fn as_str(self) -> &'static str {
        match self {
            Chipset::Ft90x => "FT90x",
            Chipset::Ft93x => "FT93x",
        }
    }
}

impl fmt::Display for Chipset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown chipset '{0}'. Allowed: FT90x, FT93x")]
pub struct UnknownChipset(pub String);

impl FromStr for Chipset {
    type Err = UnknownChipset;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ft90x" => Ok(Chipset::Ft90x),
            "ft93x" => Ok(Chipset::Ft93x),
            _ => Err(UnknownChipset(s.to_string())),
        }
    }
}

/// Which catalog a name is looked up in. Used for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CatalogKind {
    HardwareLibrary,
    ThirdPartyLibrary,
    LayeredDriver,
}

impl fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CatalogKind::HardwareLibrary => "hardware library",
            CatalogKind::ThirdPartyLibrary => "third-party library",
            CatalogKind::LayeredDriver => "layered driver",
        })
    }
}

const BOTH: &[Chipset] = &[Chipset::Ft90x, Chipset::Ft93x];
const FT90X_ONLY: &[Chipset] = &[Chipset::Ft90x];

/// Peripheral driver shipped as sources under `hardware/` in the SDK.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HardwareLibraryInfo {
    pub name: &'static str,
    /// Files under `hardware/src`, copied to `hw/src`.
    pub source_files: &'static [&'static str],
    /// Files under `hardware/include`, copied to `hw/include`.
    pub header_files: &'static [&'static str],
    pub supported_chipsets: &'static [Chipset],
}

/// Where a layered driver's files land in the project tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DriverRoot {
    /// `usb/src` and `usb/include`.
    Usb,
    /// `drivers/`.
    Drivers,
}

/// Class driver layered on top of the hardware libraries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LayeredDriverInfo {
    pub name: &'static str,
    pub root: DriverRoot,
    pub source_files: &'static [&'static str],
    pub header_files: &'static [&'static str],
    pub supported_chipsets: &'static [Chipset],
}

/// Third-party library bundled with the SDK.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ThirdPartyLibraryInfo {
    pub name: &'static str,
    /// CMake glob patterns, relative to the project root.
    pub source_paths: &'static [&'static str],
    /// SDK-relative paths skipped when the library is copied in.
    pub exclude_paths: &'static [&'static str],
    pub include_paths: &'static [&'static str],
    /// Compile definitions, emitted verbatim into the descriptor.
    pub definitions: &'static [&'static str],
    pub supported_chipsets: &'static [Chipset],
}

/// Common view over the three tables.
pub trait CatalogEntry {
    fn name(&self) -> &'static str;
    fn supported_chipsets(&self) -> &'static [Chipset];

    fn supports(&self, chipset: Chipset) -> bool {
        self.supported_chipsets().contains(&chipset)
    }
}

impl CatalogEntry for HardwareLibraryInfo {
    fn name(&self) -> &'static str {
        self.name
    }
    fn supported_chipsets(&self) -> &'static [Chipset] {
        self.supported_chipsets
    }
}

impl CatalogEntry for LayeredDriverInfo {
    fn name(&self) -> &'static str {
        self.name
    }
    fn supported_chipsets(&self) -> &'static [Chipset] {
        self.supported_chipsets
    }
}

impl CatalogEntry for ThirdPartyLibraryInfo {
    fn name(&self) -> &'static str {
        self.name
    }
    fn supported_chipsets(&self) -> &'static [Chipset] {
        self.supported_chipsets
    }
}

const fn hw(
    name: &'static str,
    source_files: &'static [&'static str],
    header_files: &'static [&'static str],
    supported_chipsets: &'static [Chipset],
) -> HardwareLibraryInfo {
    HardwareLibraryInfo { name, source_files, header_files, supported_chipsets }
}

pub static HARDWARE_LIBRARIES: &[HardwareLibraryInfo] = &[
    hw("ADC Driver", &["adc.c"], &["ft900_adc.h"], BOTH),
    hw("Bootstrap Driver", &["bootstrap.c"], &[], BOTH),
    hw("CAM Driver", &["cam.c"], &["ft900_cam.h"], FT90X_ONLY),
    hw("CAN Driver", &["can.c"], &["ft900_can.h"], FT90X_ONLY),
    hw("DAC Driver", &["dac.c"], &["ft900_dac.h"], BOTH),
    hw("Preset Delays", &["delay.c"], &["ft900_delay.h"], BOTH),
    hw("Datalogging Driver", &["dlog.c"], &["ft900_dlog.h"], BOTH),
    hw("Ethernet Driver", &["ethernet.c"], &["ft900_eth.h"], FT90X_ONLY),
    hw("GPIO Driver", &["gpio.c"], &["ft900_gpio.h"], BOTH),
    hw("I2C Master Driver", &["i2cm.c"], &["ft900_i2cm.h"], BOTH),
    hw("I2C Slave Driver", &["i2cs.c"], &["ft900_i2cs.h"], BOTH),
    hw("I2S Driver", &["i2s.c"], &["ft900_i2s.h"], FT90X_ONLY),
    hw("Interrupt Driver", &["interrupt.c"], &["ft900_interrupt.h"], BOTH),
    hw("MEMCTL Driver", &["memctl.c"], &["ft900_memctl.h"], BOTH),
    hw("PWM and PCM Driver", &["pwm.c", "pwm_pcm.c"], &["ft900_pwm.h", "ft900_pwm_pcm.h"], BOTH),
    hw("RTC Driver", &["rtc.c"], &["ft900_rtc.h"], BOTH),
    hw("SDHost Driver", &["sdhost.c"], &["ft900_sdhost.h"], BOTH),
    hw("SPI Driver", &["spi.c"], &["ft900_spi.h"], BOTH),
    hw(
        "DFU Driver",
        &["usbd_startup_dfu.c", "usbd_dfu.c"],
        &["ft900_startup_dfu.h", "ft900_usbd_dfu.h"],
        BOTH,
    ),
    hw("SYS Driver", &["sys.c"], &["ft900_sys.h"], BOTH),
    hw("Timers Driver", &["timers.c"], &["ft900_timers.h"], BOTH),
    hw("UART Driver", &["uart_simple.c"], &["ft900_uart_simple.h"], BOTH),
    hw(
        "USB Device Driver",
        &["usbd.c", "usbdx.c", "usbd_hbw.c"],
        &["ft900_usbd.h", "ft900_usbdx.h", "ft900_usbd_hbw.h"],
        BOTH,
    ),
    hw(
        "USB Host Driver",
        &["usbh.c", "usbhx.c"],
        &["ft900_usbh.h", "ft900_usbhx.h", "private/ft900_usbh_internal.h"],
        FT90X_ONLY,
    ),
    hw("Watchdog Driver", &["wdt.c"], &["ft900_wdt.h"], BOTH),
];

const fn usb_driver(
    name: &'static str,
    source_files: &'static [&'static str],
    header_files: &'static [&'static str],
) -> LayeredDriverInfo {
    LayeredDriverInfo { name, root: DriverRoot::Usb, source_files, header_files, supported_chipsets: BOTH }
}

pub static LAYERED_DRIVERS: &[LayeredDriverInfo] = &[
    usb_driver(
        "USB Header Files",
        &[],
        &[
            "ft900_usb_cdc.h",
            "ft900_usb_hid.h",
            "ft900_usb_boms.h",
            "ft900_usb_audio.h",
            "ft900_usb_uvc.h",
        ],
    ),
    usb_driver("USB Host CDCACM", &["usbh_cdcacm.c"], &["ft900_usb_cdc.h", "ft900_usbh_cdcacm.h"]),
    usb_driver("USB Host HID", &["usbh_hid.c"], &["ft900_usb_hid.h", "ft900_usbh_hid.h"]),
    usb_driver("USB Host BOMS", &["usbh_boms.c"], &["ft900_usb_boms.h", "ft900_usbh_boms.h"]),
    usb_driver("USB Host AOA", &["usbh_aoa.c"], &["ft900_usb_aoa.h", "ft900_usbh_aoa.h"]),
    usb_driver("USB Device RNDIS", &["usbd_rndis.c"], &["ft900_usb_rndis.h", "ft900_usbh_rndis.h"]),
];

pub static THIRD_PARTY_LIBRARIES: &[ThirdPartyLibraryInfo] = &[
    ThirdPartyLibraryInfo {
        name: "FatFs",
        source_paths: &["libs/thirdPartyLibs/FatFS/*.c", "libs/thirdPartyLibs/FatFS/option/*.c"],
        exclude_paths: &[],
        include_paths: &["libs/FatFs"],
        definitions: &[],
        supported_chipsets: BOTH,
    },
    ThirdPartyLibraryInfo {
        name: "FreeRTOS",
        source_paths: &[
            "libs/thirdPartyLibs/FreeRTOS/Source/portable/GCC/FT32/*.c",
            "libs/thirdPartyLibs/FreeRTOS/Source/portable/GCC/FT32/*.S",
            "libs/thirdPartyLibs/FreeRTOS/Source/portable/MemMang/*.c",
            "libs/thirdPartyLibs/FreeRTOS/Source/*.c",
        ],
        exclude_paths: &[],
        include_paths: &[
            "libs/thirdPartyLibs/FreeRTOS",
            "libs/thirdPartyLibs/FreeRTOS/Source/include",
            "libs/thirdPartyLibs/FreeRTOS/Source/portable/GCC/FT32",
        ],
        definitions: &["$<$<COMPILE_LANGUAGE:C>:-DFT32_FREERTOS -DFT32_PORT -DFT32_PORT_HEAP=4>"],
        supported_chipsets: BOTH,
    },
    ThirdPartyLibraryInfo {
        name: "tinyprintf",
        source_paths: &["libs/thirdPartyLibs/tinyprintf/*.c"],
        exclude_paths: &[],
        include_paths: &["libs/thirdPartyLibs/tinyprintf"],
        definitions: &[],
        supported_chipsets: BOTH,
    },
    ThirdPartyLibraryInfo {
        name: "lwIP",
        source_paths: &[
            "libs/thirdPartyLibs/lwIP/src/api/*.c",
            "libs/thirdPartyLibs/lwIP/src/arch/*.c",
            "libs/thirdPartyLibs/lwIP/src/core/*.c",
            "libs/thirdPartyLibs/lwIP/src/core/ipv4/*.c",
            "libs/thirdPartyLibs/lwIP/src/netif/*.c",
            "libs/thirdPartyLibs/lwIP/src/netif/ppp/*.c",
            "libs/thirdPartyLibs/lwIP/src/netif/ppp/polarssl/*.c",
        ],
        exclude_paths: &["lwIP/src/apps", "lwIP/src/core/ipv6"],
        include_paths: &[
            "libs/thirdPartyLibs/lwIP",
            "libs/thirdPartyLibs/lwIP/src/arch",
            "libs/thirdPartyLibs/lwIP/src/include",
        ],
        definitions: &[],
        supported_chipsets: BOTH,
    },
    ThirdPartyLibraryInfo {
        name: "mbedtls",
        // mbedtls links against lwIP's core; the overlap with lwIP is deduplicated on union.
        source_paths: &[
            "libs/thirdPartyLibs/mbedtls/library/*.c",
            "libs/thirdPartyLibs/lwIP/src/core/*.c",
        ],
        exclude_paths: &[
            "mbedtls/programs",
            "mbedtls/scripts",
            "mbedtls/tests",
            "mbedtls/visualc",
            "mbedtls/library/aes.c",
            "mbedtls/library/certs.c",
        ],
        include_paths: &["libs/thirdPartyLibs/mbedtls", "libs/thirdPartyLibs/mbedtls/include"],
        definitions: &["-DMBEDTLS_CONFIG_FILE=\"mbedtls_config.h\""],
        supported_chipsets: BOTH,
    },
];

pub fn hardware_library(name: &str) -> Option<&'static HardwareLibraryInfo> {
    HARDWARE_LIBRARIES.iter().find(|lib| lib.name == name)
}

pub fn layered_driver(name: &str) -> Option<&'static LayeredDriverInfo> {
    LAYERED_DRIVERS.iter().find(|drv| drv.name == name)
}

pub fn third_party_library(name: &str) -> Option<&'static ThirdPartyLibraryInfo> {
    THIRD_PARTY_LIBRARIES.iter().find(|lib| lib.name == name)
}

/// True when `name` exists in the catalog selected by `kind`.
pub fn contains(kind: CatalogKind, name: &str) -> bool {
    match kind {
        CatalogKind::HardwareLibrary => hardware_library(name).is_some(),
        CatalogKind::ThirdPartyLibrary => third_party_library(name).is_some(),
        CatalogKind::LayeredDriver => layered_driver(name).is_some(),
    }
}
