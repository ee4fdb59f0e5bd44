// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 policygen contributors

//! Built-in compliance standards
//!
//! Fragments use `{{ value }}`, `{{ key }}`, `{{ section }}` and
//! `{{ title }}` placeholders; boolean rules may also use
//! `{{ value | yesno }}` and `{{ value | noyes }}`. Every fragment must be
//! idempotent: running the generated artifact twice converges on the same
//! host state.

use super::{OsFamily, Platform, Rule, SettingValue, Severity, StandardDefinition, ValueType};

const SSH_LOG_LEVELS: &[&str] = &["INFO", "VERBOSE"];

const DEFAULT_BANNER: &str = "Authorized users only. All activity may be monitored and reported.";

/// All registered standards, in listing order
pub static STANDARDS: &[StandardDefinition] = &[
    StandardDefinition {
        id: "CIS-Linux-v8",
        title: "CIS Distribution Independent Linux Benchmark v8",
        family: OsFamily::Linux,
        rules: CIS_LINUX_V8,
    },
    StandardDefinition {
        id: "CIS-Windows-11",
        title: "CIS Microsoft Windows 11 Enterprise Benchmark v3.0.0",
        family: OsFamily::Windows,
        rules: CIS_WINDOWS_11,
    },
];

// ─────────────────────────────────────────────────────────────────────────────
// CIS Linux
// ─────────────────────────────────────────────────────────────────────────────

pub static CIS_LINUX_V8: &[Rule] = &[
    Rule {
        key: "disable_cramfs",
        section: "1.1.1.1",
        title: "Ensure mounting of cramfs filesystems is disabled",
        severity: Severity::Medium,
        value_type: ValueType::Boolean,
        default: SettingValue::Bool(true),
        fragments: &[
            (
                Platform::Shell,
                r#"if {{ value }}; then
  printf 'install cramfs /bin/false\nblacklist cramfs\n' > /etc/modprobe.d/cramfs.conf
  modprobe -r cramfs 2>/dev/null || true
fi"#,
            ),
            (
                Platform::Ansible,
                r#"- name: {{ title }}
  ansible.builtin.copy:
    dest: /etc/modprobe.d/cramfs.conf
    content: "install cramfs /bin/false\nblacklist cramfs\n"
    owner: root
    group: root
    mode: "0644"
  when: {{ value }}"#,
            ),
        ],
    },
    Rule {
        key: "grub_config_permissions",
        section: "1.4.2",
        title: "Ensure permissions on bootloader config are configured",
        severity: Severity::Medium,
        value_type: ValueType::Boolean,
        default: SettingValue::Bool(true),
        fragments: &[(
            Platform::Shell,
            r#"if {{ value }} && [ -f /boot/grub/grub.cfg ]; then
  chown root:root /boot/grub/grub.cfg
  chmod u-x,go-rwx /boot/grub/grub.cfg
fi"#,
        )],
    },
    Rule {
        key: "enable_aslr",
        section: "1.5.2",
        title: "Ensure address space layout randomization (ASLR) is enabled",
        severity: Severity::High,
        value_type: ValueType::Boolean,
        default: SettingValue::Bool(true),
        fragments: &[
            (
                Platform::Shell,
                r#"if {{ value }}; then
  printf 'kernel.randomize_va_space = 2\n' > /etc/sysctl.d/60-kernel_sysctl.conf
  sysctl -w kernel.randomize_va_space=2 >/dev/null
fi"#,
            ),
            (
                Platform::Ansible,
                r#"- name: {{ title }}
  ansible.posix.sysctl:
    name: kernel.randomize_va_space
    value: "2"
    sysctl_file: /etc/sysctl.d/60-kernel_sysctl.conf
    state: present
  when: {{ value }}"#,
            ),
        ],
    },
    Rule {
        key: "login_banner",
        section: "1.7.3",
        title: "Ensure remote login warning banner is configured properly",
        severity: Severity::Low,
        value_type: ValueType::Text,
        default: SettingValue::text(DEFAULT_BANNER),
        fragments: &[
            (
                Platform::Shell,
                r#"printf '%s\n' {{ value }} > /etc/issue.net
chown root:root /etc/issue.net
chmod 644 /etc/issue.net"#,
            ),
            (
                Platform::Ansible,
                r#"- name: {{ title }}
  ansible.builtin.copy:
    dest: /etc/issue.net
    content: {{ value }}
    owner: root
    group: root
    mode: "0644""#,
            ),
        ],
    },
    Rule {
        key: "disable_avahi",
        section: "2.2.3",
        title: "Ensure Avahi Server is not enabled",
        severity: Severity::Medium,
        value_type: ValueType::Boolean,
        default: SettingValue::Bool(true),
        fragments: &[
            (
                Platform::Shell,
                r#"if {{ value }}; then
  systemctl disable --now avahi-daemon.socket avahi-daemon.service 2>/dev/null || true
fi"#,
            ),
            (
                Platform::Ansible,
                r#"- name: {{ title }}
  ansible.builtin.systemd:
    name: avahi-daemon
    state: stopped
    enabled: false
  failed_when: false
  when: {{ value }}"#,
            ),
        ],
    },
    Rule {
        key: "disable_ip_forwarding",
        section: "3.3.1",
        title: "Ensure IP forwarding is disabled",
        severity: Severity::Medium,
        value_type: ValueType::Boolean,
        default: SettingValue::Bool(true),
        fragments: &[
            (
                Platform::Shell,
                r#"if {{ value }}; then
  printf 'net.ipv4.ip_forward = 0\n' > /etc/sysctl.d/60-netipv4_sysctl.conf
  sysctl -w net.ipv4.ip_forward=0 >/dev/null
fi"#,
            ),
            (
                Platform::Ansible,
                r#"- name: {{ title }}
  ansible.posix.sysctl:
    name: net.ipv4.ip_forward
    value: "0"
    sysctl_file: /etc/sysctl.d/60-netipv4_sysctl.conf
    state: present
  when: {{ value }}"#,
            ),
        ],
    },
    Rule {
        key: "enable_auditd",
        section: "4.1.1.2",
        title: "Ensure auditd service is enabled and active",
        severity: Severity::High,
        value_type: ValueType::Boolean,
        default: SettingValue::Bool(true),
        fragments: &[
            (
                Platform::Shell,
                r#"if {{ value }}; then
  systemctl enable --now auditd
fi"#,
            ),
            (
                Platform::Ansible,
                r#"- name: {{ title }}
  ansible.builtin.systemd:
    name: auditd
    state: started
    enabled: true
  when: {{ value }}"#,
            ),
        ],
    },
    Rule {
        key: "ssh_log_level",
        section: "5.2.5",
        title: "Ensure SSH LogLevel is appropriate",
        severity: Severity::Low,
        value_type: ValueType::Choice(SSH_LOG_LEVELS),
        default: SettingValue::text("INFO"),
        fragments: &[
            (
                Platform::Shell,
                r#"sed -i -E '/^#?[[:space:]]*LogLevel[[:space:]]/d' /etc/ssh/sshd_config
printf 'LogLevel %s\n' {{ value }} >> /etc/ssh/sshd_config"#,
            ),
            (
                Platform::Ansible,
                r#"- name: {{ title }}
  ansible.builtin.lineinfile:
    path: /etc/ssh/sshd_config
    regexp: '^#?\s*LogLevel\s'
    line: "LogLevel {{ value }}"
    validate: /usr/sbin/sshd -t -f %s"#,
            ),
        ],
    },
    Rule {
        key: "ssh_max_auth_tries",
        section: "5.2.7",
        title: "Ensure SSH MaxAuthTries is set to 4 or less",
        severity: Severity::Medium,
        value_type: ValueType::Integer { min: 1, max: 10 },
        default: SettingValue::Integer(4),
        fragments: &[
            (
                Platform::Shell,
                r#"sed -i -E '/^#?[[:space:]]*MaxAuthTries[[:space:]]/d' /etc/ssh/sshd_config
printf 'MaxAuthTries %s\n' {{ value }} >> /etc/ssh/sshd_config"#,
            ),
            (
                Platform::Ansible,
                r#"- name: {{ title }}
  ansible.builtin.lineinfile:
    path: /etc/ssh/sshd_config
    regexp: '^#?\s*MaxAuthTries\s'
    line: "MaxAuthTries {{ value }}"
    validate: /usr/sbin/sshd -t -f %s"#,
            ),
        ],
    },
    Rule {
        key: "disable_root_login",
        section: "5.2.10",
        title: "Ensure SSH root login is disabled",
        severity: Severity::High,
        value_type: ValueType::Boolean,
        default: SettingValue::Bool(true),
        fragments: &[
            (
                Platform::Shell,
                r#"sed -i -E '/^#?[[:space:]]*PermitRootLogin[[:space:]]/d' /etc/ssh/sshd_config
printf 'PermitRootLogin %s\n' {{ value | noyes }} >> /etc/ssh/sshd_config"#,
            ),
            (
                Platform::Ansible,
                r#"- name: {{ title }}
  ansible.builtin.lineinfile:
    path: /etc/ssh/sshd_config
    regexp: '^#?\s*PermitRootLogin\s'
    line: "PermitRootLogin {{ value | noyes }}"
    validate: /usr/sbin/sshd -t -f %s"#,
            ),
        ],
    },
    Rule {
        key: "ssh_client_alive_interval",
        section: "5.2.16",
        title: "Ensure SSH Idle Timeout Interval is configured",
        severity: Severity::Medium,
        value_type: ValueType::Integer { min: 1, max: 900 },
        default: SettingValue::Integer(300),
        fragments: &[
            (
                Platform::Shell,
                r#"sed -i -E '/^#?[[:space:]]*ClientAliveInterval[[:space:]]/d' /etc/ssh/sshd_config
printf 'ClientAliveInterval %s\n' {{ value }} >> /etc/ssh/sshd_config"#,
            ),
            (
                Platform::Ansible,
                r#"- name: {{ title }}
  ansible.builtin.lineinfile:
    path: /etc/ssh/sshd_config
    regexp: '^#?\s*ClientAliveInterval\s'
    line: "ClientAliveInterval {{ value }}"
    validate: /usr/sbin/sshd -t -f %s"#,
            ),
        ],
    },
    Rule {
        key: "password_min_length",
        section: "5.3.1",
        title: "Ensure password creation requirements are configured",
        severity: Severity::Medium,
        value_type: ValueType::Integer { min: 8, max: 128 },
        default: SettingValue::Integer(14),
        fragments: &[
            (
                Platform::Shell,
                r#"sed -i -E '/^#?[[:space:]]*minlen[[:space:]]*=/d' /etc/security/pwquality.conf
printf 'minlen = %s\n' {{ value }} >> /etc/security/pwquality.conf"#,
            ),
            (
                Platform::Ansible,
                r#"- name: {{ title }}
  ansible.builtin.lineinfile:
    path: /etc/security/pwquality.conf
    regexp: '^#?\s*minlen\s*='
    line: "minlen = {{ value }}"
    create: true"#,
            ),
        ],
    },
    Rule {
        key: "password_max_days",
        section: "5.4.1.1",
        title: "Ensure password expiration is 365 days or less",
        severity: Severity::Medium,
        value_type: ValueType::Integer { min: 1, max: 365 },
        default: SettingValue::Integer(365),
        fragments: &[
            (
                Platform::Shell,
                r#"sed -i -E '/^#?[[:space:]]*PASS_MAX_DAYS[[:space:]]/d' /etc/login.defs
printf 'PASS_MAX_DAYS %s\n' {{ value }} >> /etc/login.defs"#,
            ),
            (
                Platform::Ansible,
                r#"- name: {{ title }}
  ansible.builtin.lineinfile:
    path: /etc/login.defs
    regexp: '^#?\s*PASS_MAX_DAYS\s'
    line: "PASS_MAX_DAYS {{ value }}""#,
            ),
        ],
    },
];

// ─────────────────────────────────────────────────────────────────────────────
// CIS Windows
// ─────────────────────────────────────────────────────────────────────────────

pub static CIS_WINDOWS_11: &[Rule] = &[
    Rule {
        key: "password_history",
        section: "1.1.1",
        title: "Ensure 'Enforce password history' is set to '24 or more password(s)'",
        severity: Severity::Medium,
        value_type: ValueType::Integer { min: 0, max: 24 },
        default: SettingValue::Integer(24),
        fragments: &[
            (
                Platform::PowerShell,
                r#"net accounts /uniquepw:{{ value }} | Out-Null"#,
            ),
            (
                Platform::Ansible,
                r#"- name: {{ title }}
  community.windows.win_security_policy:
    section: System Access
    key: PasswordHistorySize
    value: "{{ value }}""#,
            ),
        ],
    },
    Rule {
        key: "max_password_age",
        section: "1.1.2",
        title: "Ensure 'Maximum password age' is set to '365 or fewer days, but not 0'",
        severity: Severity::Medium,
        value_type: ValueType::Integer { min: 1, max: 365 },
        default: SettingValue::Integer(365),
        fragments: &[(
            Platform::PowerShell,
            r#"net accounts /maxpwage:{{ value }} | Out-Null"#,
        )],
    },
    Rule {
        key: "min_password_length",
        section: "1.1.4",
        title: "Ensure 'Minimum password length' is set to '14 or more character(s)'",
        severity: Severity::Medium,
        value_type: ValueType::Integer { min: 1, max: 14 },
        default: SettingValue::Integer(14),
        fragments: &[
            (
                Platform::PowerShell,
                r#"net accounts /minpwlen:{{ value }} | Out-Null"#,
            ),
            (
                Platform::Ansible,
                r#"- name: {{ title }}
  community.windows.win_security_policy:
    section: System Access
    key: MinimumPasswordLength
    value: "{{ value }}""#,
            ),
        ],
    },
    Rule {
        key: "lockout_threshold",
        section: "1.2.2",
        title: "Ensure 'Account lockout threshold' is set to '5 or fewer invalid logon attempt(s), but not 0'",
        severity: Severity::Medium,
        value_type: ValueType::Integer { min: 1, max: 5 },
        default: SettingValue::Integer(5),
        fragments: &[
            (
                Platform::PowerShell,
                r#"net accounts /lockoutthreshold:{{ value }} | Out-Null"#,
            ),
            (
                Platform::Ansible,
                r#"- name: {{ title }}
  community.windows.win_security_policy:
    section: System Access
    key: LockoutBadCount
    value: "{{ value }}""#,
            ),
        ],
    },
    Rule {
        key: "disable_guest_account",
        section: "2.3.1.2",
        title: "Ensure 'Accounts: Guest account status' is set to 'Disabled'",
        severity: Severity::High,
        value_type: ValueType::Boolean,
        default: SettingValue::Bool(true),
        fragments: &[(
            Platform::PowerShell,
            r#"if (${{ value }}) {
    Disable-LocalUser -Name 'Guest' -ErrorAction SilentlyContinue
}"#,
        )],
    },
    Rule {
        key: "legal_notice_text",
        section: "2.3.7.4",
        title: "Configure 'Interactive logon: Message text for users attempting to log on'",
        severity: Severity::Low,
        value_type: ValueType::Text,
        default: SettingValue::text(DEFAULT_BANNER),
        fragments: &[(
            Platform::PowerShell,
            r#"Set-ItemProperty -Path 'HKLM:\SOFTWARE\Microsoft\Windows\CurrentVersion\Policies\System' -Name 'LegalNoticeText' -Value {{ value }}"#,
        )],
    },
    Rule {
        key: "enable_firewall",
        section: "9.1.1",
        title: "Ensure 'Windows Firewall' is set to 'On' for all profiles",
        severity: Severity::High,
        value_type: ValueType::Boolean,
        default: SettingValue::Bool(true),
        fragments: &[
            (
                Platform::PowerShell,
                r#"if (${{ value }}) {
    Set-NetFirewallProfile -Profile Domain,Private,Public -Enabled True
}"#,
            ),
            (
                Platform::Ansible,
                r#"- name: {{ title }}
  community.windows.win_firewall:
    state: enabled
    profiles:
      - Domain
      - Private
      - Public
  when: {{ value }}"#,
            ),
        ],
    },
    Rule {
        key: "disable_smb1",
        section: "18.4.3",
        title: "Ensure 'Configure SMB v1 server' is set to 'Disabled'",
        severity: Severity::High,
        value_type: ValueType::Boolean,
        default: SettingValue::Bool(true),
        fragments: &[(
            Platform::PowerShell,
            r#"if (${{ value }}) {
    Set-SmbServerConfiguration -EnableSMB1Protocol $false -Force
}"#,
        )],
    },
];
