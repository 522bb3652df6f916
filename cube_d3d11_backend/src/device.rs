use crate::adapter::{choose_adapter, enumerate_adapters};
use crate::result::{D3D11Error, Result};

use log::{info, warn};
use windows::core::Interface;
use windows::Win32::{
    Foundation::{HMODULE, TRUE},
    Graphics::{
        Direct3D::{D3D_DRIVER_TYPE_UNKNOWN, D3D_FEATURE_LEVEL, D3D_FEATURE_LEVEL_11_0},
        Direct3D11::{
            D3D11CreateDevice, ID3D11Device, ID3D11DeviceContext, ID3D11InfoQueue,
            D3D11_CREATE_DEVICE_BGRA_SUPPORT, D3D11_CREATE_DEVICE_DEBUG,
            D3D11_MESSAGE_SEVERITY_CORRUPTION, D3D11_MESSAGE_SEVERITY_ERROR, D3D11_SDK_VERSION,
        },
        Dxgi::{CreateDXGIFactory1, IDXGIFactory2},
    },
};

pub struct D3D11Device {
    pub factory: IDXGIFactory2,
    pub device: ID3D11Device,
    pub context: ID3D11DeviceContext,
}

impl D3D11Device {
    pub fn new() -> Result<Self> {
        let factory: IDXGIFactory2 = unsafe { CreateDXGIFactory1()? };
        let mut adapters = enumerate_adapters(&factory)?;
        let summaries: Vec<_> = adapters.iter().map(|(_, summary)| summary.clone()).collect();
        let chosen = choose_adapter(&summaries).ok_or(D3D11Error::NoHardwareAdapter(adapters.len()))?;
        let (adapter, summary) = adapters.swap_remove(chosen);
        info!("Using adapter {}", summary.description);

        let flags = if cfg!(debug_assertions) {
            D3D11_CREATE_DEVICE_BGRA_SUPPORT | D3D11_CREATE_DEVICE_DEBUG
        } else {
            D3D11_CREATE_DEVICE_BGRA_SUPPORT
        };
        let feature_levels = [D3D_FEATURE_LEVEL_11_0];

        let mut device: Option<ID3D11Device> = None;
        let mut context: Option<ID3D11DeviceContext> = None;
        let mut feature_level = D3D_FEATURE_LEVEL::default();
        unsafe {
            // an explicit adapter requires the unknown driver type
            D3D11CreateDevice(
                &adapter,
                D3D_DRIVER_TYPE_UNKNOWN,
                HMODULE(std::ptr::null_mut()),
                flags,
                Some(&feature_levels[..]),
                D3D11_SDK_VERSION,
                Some(&mut device),
                Some(&mut feature_level),
                Some(&mut context),
            )?;
        }
        let device = device.ok_or(D3D11Error::MissingObject("device"))?;
        let context = context.ok_or(D3D11Error::MissingObject("immediate context"))?;
        info!("Created device at feature level {:#x}", feature_level.0);

        if cfg!(debug_assertions) {
            break_on_errors(&device);
        }

        Ok(Self {
            factory,
            device,
            context,
        })
    }
}

/// Makes the debug layer stop in the debugger when it reports corruption or an error.
fn break_on_errors(device: &ID3D11Device) {
    let info_queue = match device.cast::<ID3D11InfoQueue>() {
        Ok(info_queue) => info_queue,
        Err(error) => {
            warn!("Debug layer has no info queue: {}", error);
            return;
        }
    };
    for severity in [D3D11_MESSAGE_SEVERITY_CORRUPTION, D3D11_MESSAGE_SEVERITY_ERROR].iter() {
        if let Err(error) = unsafe { info_queue.SetBreakOnSeverity(*severity, TRUE) } {
            warn!("Failed to break on {:?}: {}", severity, error);
        }
    }
}
