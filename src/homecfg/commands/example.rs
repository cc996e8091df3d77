use crate::commands::CmdResult;
use crate::error::Result;

pub const EXAMPLE: &str = "\
- Media:
    - Emby:
        icon: https://example.com/emby-icon.png
        href: http://10.0.0.2:8096
        ping: http://10.0.0.2:8096
        server: unraid
        container: emby
        widget:
            type: emby
            url: http://10.0.0.2:8096
            key: your_api_key_here
            enableBlocks: true
            enableNowPlaying: true

    - Qbittorrent:
        icon: https://example.com/qb-icon.png
        href: http://10.0.0.2:8889
        ping: http://10.0.0.2:8889
        widget:
            type: qbittorrent
            url: http://10.0.0.2:8889
            username: admin
            password: your_password

- Tools:
    - FileBrowser:
        icon: https://example.com/filebrowser-icon.png
        href: http://10.0.0.2:380
        ping: http://10.0.0.2:380
        server: unraid
        container: FileBrowser
";

pub fn run() -> Result<CmdResult> {
    Ok(CmdResult::default().with_text(EXAMPLE.to_string()))
}
