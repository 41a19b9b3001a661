//! Template sources for Windows bundling.

/// Batch launcher placed in the app folder.
pub const LAUNCHER_BAT: &str = r#"@echo off
rem {{display_name}} launcher
setlocal
set "DIR=%~dp0"
{{#if administrator_required}}
net session >nul 2>&1
if %errorlevel% neq 0 (
    powershell -NoProfile -Command "Start-Process -Verb RunAs -FilePath '%~f0'"
    exit /b
)
{{/if}}
{{#if use_resources_as_working_dir}}
cd /d "%DIR%"
{{/if}}
{{#if env_path}}
set "PATH={{env_path}};%PATH%"
{{/if}}
{{#if bundle_jre}}
if exist "%DIR%{{jre_directory_name}}\bin\javaw.exe" (
    set "JAVA=%DIR%{{jre_directory_name}}\bin\javaw.exe"
) else (
    set "JAVA=javaw"
)
{{else}}
set "JAVA=javaw"
{{/if}}
{{#if main_class}}
start "" "%JAVA%"{{#each vm_args}} {{this}}{{/each}} -cp "{{classpath}}" {{main_class}} %*
{{else}}
start "" "%JAVA%"{{#each vm_args}} {{this}}{{/each}} -jar "%DIR%{{jar_name}}" %*
{{/if}}
endlocal
"#;

/// Application manifest shipped next to the launcher.
pub const EXE_MANIFEST: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<assembly xmlns="urn:schemas-microsoft-com:asm.v1" manifestVersion="1.0">
<assemblyIdentity version="{{version_win}}" processorArchitecture="*" name="{{organization_name}}.{{name}}" type="win32"/>
<description>{{description}}</description>
<trustInfo xmlns="urn:schemas-microsoft-com:asm.v2">
<security>
<requestedPrivileges>
{{#if administrator_required}}
<requestedExecutionLevel level="requireAdministrator" uiAccess="false"/>
{{else}}
<requestedExecutionLevel level="asInvoker" uiAccess="false"/>
{{/if}}
</requestedPrivileges>
</security>
</trustInfo>
</assembly>
"#;

/// WiX source for the merge module carrying the whole app folder.
pub const MSM_WXS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Wix xmlns="http://schemas.microsoft.com/wix/2006/wi">
<Module Id="{{module_id}}" Language="1033" Version="{{version_win}}">
<Package Id="{{package_guid}}" Manufacturer="{{organization_name}}" Description="{{description}}" InstallerVersion="200"/>
<Directory Id="TARGETDIR" Name="SourceDir">
<Directory Id="MergeRedirectFolder" Name="{{name}}">
{{harvest}}
</Directory>
</Directory>
</Module>
</Wix>
"#;

/// WiX source for the MSI installer embedding the merge module.
pub const MSI_WXS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Wix xmlns="http://schemas.microsoft.com/wix/2006/wi">
<Product Id="*" Name="{{display_name}}" Language="1033" Version="{{version_win}}" Manufacturer="{{organization_name}}" UpgradeCode="{{upgrade_code}}">
<Package Description="{{description}}" InstallerVersion="200" Compressed="yes"/>
<Media Id="1" Cabinet="app.cab" EmbedCab="yes"/>
<MajorUpgrade AllowSameVersionUpgrades="yes" DowngradeErrorMessage="A newer version of {{display_name}} is already installed."/>
<Directory Id="TARGETDIR" Name="SourceDir">
<Directory Id="ProgramFilesFolder">
<Directory Id="INSTALLDIR" Name="{{display_name}}">
<Merge Id="AppModule" SourceFile="{{msm_file}}" Language="1033" DiskId="1"/>
</Directory>
</Directory>
</Directory>
<Feature Id="Complete" Title="{{display_name}}" Level="1">
<MergeRef Id="AppModule"/>
</Feature>
</Product>
</Wix>
"#;

/// Inno Setup script for the self-extracting installer.
pub const ISS_SETUP: &str = r#"[Setup]
AppId={{app_id}}
AppName={{display_name}}
AppVersion={{version}}
AppPublisher={{organization_name}}
{{#if url}}
AppPublisherURL={{url}}
{{/if}}
DefaultDirName={autopf}\{{display_name}}
DisableProgramGroupPage=yes
OutputDir={{output_dir}}
OutputBaseFilename={{name}}_{{version}}
{{#if license_file}}
LicenseFile={{license_file}}
{{/if}}
{{#if administrator_required}}
PrivilegesRequired=admin
{{else}}
PrivilegesRequired=lowest
{{/if}}
SetupIconFile={{icon_file}}
Compression=lzma
SolidCompression=yes

[Languages]
{{#each languages}}
Name: "{{this}}"; MessagesFile: "compiler:Default.isl"
{{/each}}

[Files]
Source: "{{app_folder}}\*"; DestDir: "{app}"; Flags: ignoreversion recursesubdirs createallsubdirs

[Icons]
Name: "{autoprograms}\{{display_name}}"; Filename: "{app}\{{executable_name}}"
Name: "{autodesktop}\{{display_name}}"; Filename: "{app}\{{executable_name}}"
"#;
