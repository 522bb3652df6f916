//! Adapter choice. The DXGI enumeration is windows only, the decision itself is plain data.

//////////////////////// Structs ///////////////////////
/// What we need to know about a DXGI adapter to rank it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdapterSummary {
    pub description: String,
    pub dedicated_video_memory: usize,
    pub software: bool,
}
//////////////////////// Fns ///////////////////////
/// Index of the hardware adapter with the most dedicated video memory.
/// The first one enumerated wins a tie, which is the one DXGI considers primary.
pub fn choose_adapter(adapters: &[AdapterSummary]) -> Option<usize> {
    adapters
        .iter()
        .enumerate()
        .filter(|(_, adapter)| !adapter.software)
        .fold(None, |best: Option<(usize, usize)>, (index, adapter)| match best {
            Some((_, memory)) if memory >= adapter.dedicated_video_memory => best,
            _ => Some((index, adapter.dedicated_video_memory)),
        })
        .map(|(index, _)| index)
}

/// DXGI hands out descriptions as nul padded UTF-16.
pub fn description_from_wide(wide: &[u16]) -> String {
    let end = wide.iter().position(|c| *c == 0).unwrap_or(wide.len());
    String::from_utf16_lossy(&wide[..end])
}

#[cfg(target_os = "windows")]
pub use self::enumeration::enumerate_adapters;

#[cfg(target_os = "windows")]
mod enumeration {
    use super::{description_from_wide, AdapterSummary};
    use crate::result::Result;

    use log::info;
    use windows::Win32::Graphics::Dxgi::{
        IDXGIAdapter1, IDXGIFactory2, DXGI_ADAPTER_FLAG_SOFTWARE, DXGI_ERROR_NOT_FOUND,
    };

    /// Every adapter the factory knows about, in DXGI order.
    pub fn enumerate_adapters(
        factory: &IDXGIFactory2,
    ) -> Result<Vec<(IDXGIAdapter1, AdapterSummary)>> {
        let mut adapters = Vec::new();
        let mut index = 0;
        loop {
            let adapter = match unsafe { factory.EnumAdapters1(index) } {
                Ok(adapter) => adapter,
                Err(error) if error.code() == DXGI_ERROR_NOT_FOUND => break,
                Err(error) => return Err(error.into()),
            };
            let desc = unsafe { adapter.GetDesc1()? };
            let summary = AdapterSummary {
                description: description_from_wide(&desc.Description),
                dedicated_video_memory: desc.DedicatedVideoMemory,
                software: desc.Flags & DXGI_ADAPTER_FLAG_SOFTWARE.0 as u32 != 0,
            };
            info!(
                "Adapter {}: {} ({} MiB dedicated{})",
                index,
                summary.description,
                summary.dedicated_video_memory / (1024 * 1024),
                if summary.software { ", software" } else { "" }
            );
            adapters.push((adapter, summary));
            index += 1;
        }
        Ok(adapters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(description: &str, memory: usize, software: bool) -> AdapterSummary {
        AdapterSummary {
            description: description.to_owned(),
            dedicated_video_memory: memory,
            software,
        }
    }

    #[test]
    fn picks_most_dedicated_memory() {
        let adapters = vec![
            summary("integrated", 128, false),
            summary("discrete", 8192, false),
            summary("older discrete", 4096, false),
        ];
        assert_eq!(choose_adapter(&adapters), Some(1));
    }

    #[test]
    fn skips_software_adapters() {
        let adapters = vec![
            summary("Microsoft Basic Render Driver", 1 << 40, true),
            summary("integrated", 128, false),
        ];
        assert_eq!(choose_adapter(&adapters), Some(1));
        assert_eq!(choose_adapter(&adapters[..1]), None);
        assert_eq!(choose_adapter(&[]), None);
    }

    #[test]
    fn tie_keeps_first_enumerated() {
        let adapters = vec![summary("a", 0, false), summary("b", 0, false)];
        assert_eq!(choose_adapter(&adapters), Some(0));
    }

    #[test]
    fn description_stops_at_nul() {
        let mut wide = [0u16; 128];
        for (slot, c) in wide.iter_mut().zip("Radeon".encode_utf16()) {
            *slot = c;
        }
        assert_eq!(description_from_wide(&wide), "Radeon");
        let full: Vec<u16> = "no nul".encode_utf16().collect();
        assert_eq!(description_from_wide(&full), "no nul");
    }
}
